//! Boundary to the external project packager.
//!
//! The packager itself is an opaque collaborator. Everything this crate needs
//! from it fits behind [`Packager::pack`]: project bytes and a [`Preset`] in,
//! a [`PackagedArtifact`] out.

mod command;

pub use command::CommandPackager;
pub use command::DEFAULT_TIMEOUT;

use crate::PackError;
use crate::Preset;
use crate::Result;

/// Leading bytes of a zip local file header.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Output of one packager call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackagedArtifact {
    /// A single in-memory document.
    Document(Vec<u8>),
    /// An in-memory zip holding a virtual file tree.
    Archive(Vec<u8>),
}

impl PackagedArtifact {
    /// Wraps raw packager output according to what `preset` produces.
    ///
    /// # Errors
    ///
    /// Returns `PackError::Packaging` if the output is empty, or if an
    /// archive preset returned something that is not a zip.
    ///
    /// # Examples
    ///
    /// ```
    /// use sb3pack_core::PackagedArtifact;
    /// use sb3pack_core::Preset;
    ///
    /// let doc = PackagedArtifact::from_output(b"<html></html>".to_vec(), Preset::Html).unwrap();
    /// assert!(!doc.is_archive());
    ///
    /// assert!(PackagedArtifact::from_output(Vec::new(), Preset::Html).is_err());
    /// ```
    pub fn from_output(bytes: Vec<u8>, preset: Preset) -> Result<Self> {
        if bytes.is_empty() {
            return Err(PackError::Packaging {
                reason: "packager returned an empty result".to_string(),
            });
        }

        if preset.produces_archive() {
            if !bytes.starts_with(ZIP_MAGIC) {
                return Err(PackError::Packaging {
                    reason: format!(
                        "preset '{preset}' expects a zip but the packager returned something else"
                    ),
                });
            }
            Ok(Self::Archive(bytes))
        } else {
            Ok(Self::Document(bytes))
        }
    }

    /// Returns `true` for zip output.
    #[must_use]
    pub const fn is_archive(&self) -> bool {
        matches!(self, Self::Archive(_))
    }

    /// Raw artifact bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Document(bytes) | Self::Archive(bytes) => bytes,
        }
    }

    /// Size of the artifact in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    /// Returns `true` if the artifact holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }
}

/// Compiles a project archive into a standalone web artifact.
///
/// Implementations are called at most once per input file and never
/// concurrently by the batch driver.
///
/// # Examples
///
/// ```
/// use sb3pack_core::PackagedArtifact;
/// use sb3pack_core::Packager;
/// use sb3pack_core::Preset;
///
/// struct Echo;
///
/// impl Packager for Echo {
///     fn pack(&self, project: &[u8], preset: Preset) -> sb3pack_core::Result<PackagedArtifact> {
///         PackagedArtifact::from_output(project.to_vec(), preset)
///     }
/// }
///
/// let artifact = Echo.pack(b"<p>hi</p>", Preset::Html).unwrap();
/// assert_eq!(artifact.bytes(), b"<p>hi</p>");
/// ```
pub trait Packager {
    /// Packages `project` using `preset`.
    ///
    /// # Errors
    ///
    /// Returns `PackError::Packaging` or `PackError::PackagerTimeout` when the
    /// packager fails; any other variant is passed through unchanged.
    fn pack(&self, project: &[u8], preset: Preset) -> Result<PackagedArtifact>;
}

impl<P: Packager + ?Sized> Packager for &P {
    fn pack(&self, project: &[u8], preset: Preset) -> Result<PackagedArtifact> {
        (**self).pack(project, preset)
    }
}

impl<P: Packager + ?Sized> Packager for Box<P> {
    fn pack(&self, project: &[u8], preset: Preset) -> Result<PackagedArtifact> {
        (**self).pack(project, preset)
    }
}
