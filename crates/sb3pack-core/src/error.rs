//! Error types for project discovery, packaging and artifact writing.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using `PackError`.
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors that can occur while converting project archives.
#[derive(Error, Debug)]
pub enum PackError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source root is missing, not a directory, or could not be walked.
    #[error("cannot discover projects under {path}: {reason}")]
    Discovery {
        /// The directory that could not be walked.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// A discovered project file could not be read.
    #[error("cannot read project {path}: {source}")]
    Read {
        /// The project file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The packager failed or returned an unusable result.
    #[error("packaging failed: {reason}")]
    Packaging {
        /// Reason reported by (or about) the packager.
        reason: String,
    },

    /// The packager did not finish within the configured time.
    #[error("packager did not finish within {}s", timeout.as_secs_f64())]
    PackagerTimeout {
        /// The limit that expired.
        timeout: Duration,
    },

    /// An output file or directory could not be written.
    #[error("cannot write {path}: {source}")]
    Write {
        /// The path being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The packaged archive could not be read as a zip.
    #[error("invalid packaged archive: {0}")]
    InvalidArchive(String),

    /// An archive entry would be written outside its destination.
    #[error("archive entry escapes destination: {name}")]
    UnsafeEntry {
        /// The raw entry name.
        name: String,
    },

    /// Cleaning this output directory would remove input projects.
    #[error("refusing to clean {path}: it contains input projects")]
    ProtectedDestination {
        /// The directory that would have been removed.
        path: PathBuf,
    },

    /// Another job in the same run already writes to this destination.
    #[error("destination already claimed by another project: {path}")]
    DestinationCollision {
        /// The contested destination root.
        path: PathBuf,
    },
}

impl PackError {
    /// Returns `true` if this error ends the run before any job is processed.
    ///
    /// # Examples
    ///
    /// ```
    /// use sb3pack_core::PackError;
    /// use std::path::PathBuf;
    ///
    /// let err = PackError::Discovery {
    ///     path: PathBuf::from("missing"),
    ///     reason: "not found".to_string(),
    /// };
    /// assert!(err.is_fatal());
    ///
    /// let err = PackError::Packaging { reason: "boom".to_string() };
    /// assert!(!err.is_fatal());
    /// ```
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Discovery { .. })
    }

    /// Returns `true` if this error belongs to a single job and is subject to
    /// the batch failure policy.
    #[must_use]
    pub const fn is_per_file(&self) -> bool {
        !self.is_fatal()
    }

    /// Returns `true` if the error came from the packager boundary.
    #[must_use]
    pub const fn is_packaging(&self) -> bool {
        matches!(self, Self::Packaging { .. } | Self::PackagerTimeout { .. })
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

// Packaged archives are always read from memory, so even an I/O error
// from the zip reader means the archive itself is malformed.
impl From<zip::result::ZipError> for PackError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::InvalidArchive(err.to_string())
    }
}
