//! Batch configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::Preset;
use crate::discovery::PROJECT_EXTENSION;

/// Shape of the output written for each project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputLayout {
    /// `<dest>/<base>/...` for every project.
    FlatFolder,
    /// `<dest>/<base>.<ext>`, one file per project.
    SingleFile,
    /// `<dest>/<relative dir>/<base>/...`, mirroring the source tree.
    #[default]
    Mirrored,
}

impl OutputLayout {
    /// Short name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FlatFolder => "flat",
            Self::SingleFile => "single",
            Self::Mirrored => "mirrored",
        }
    }
}

impl fmt::Display for OutputLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" | "flat-folder" => Ok(Self::FlatFolder),
            "single" | "single-file" => Ok(Self::SingleFile),
            "mirrored" | "mirror" => Ok(Self::Mirrored),
            other => Err(format!(
                "unknown layout '{other}' (expected one of: flat, single, mirrored)"
            )),
        }
    }
}

/// What the driver does after a job fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failure and move on to the next project.
    #[default]
    Continue,
    /// Stop the batch at the first failure.
    Abort,
}

impl FailurePolicy {
    /// Builds a policy from a continue-on-error flag.
    #[must_use]
    pub const fn from_continue_on_error(continue_on_error: bool) -> Self {
        if continue_on_error {
            Self::Continue
        } else {
            Self::Abort
        }
    }

    /// Returns `true` for best-effort batches.
    #[must_use]
    pub const fn continue_on_error(self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// Configuration for one batch run.
///
/// The defaults convert every project in place: output lands next to each
/// source file, in a folder named after it, with the generated page renamed
/// to `<base>.html`.
///
/// # Examples
///
/// ```
/// use sb3pack_core::BatchConfig;
/// use sb3pack_core::FailurePolicy;
/// use sb3pack_core::OutputLayout;
/// use sb3pack_core::Preset;
///
/// let config = BatchConfig::new("./sb3")
///     .with_dest_root("./dist")
///     .with_layout(OutputLayout::SingleFile)
///     .with_preset(Preset::Html)
///     .with_failure_policy(FailurePolicy::Abort);
///
/// assert_eq!(config.dest_root().to_str(), Some("./dist"));
/// ```
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory searched for projects.
    pub source_root: PathBuf,

    /// Directory receiving output; `None` writes into the source root.
    pub dest_root: Option<PathBuf>,

    /// Output shape.
    pub layout: OutputLayout,

    /// Packager preset.
    pub preset: Preset,

    /// Behavior after a failed job.
    pub failure_policy: FailurePolicy,

    /// Rename the generated `index.html` to `<base>.html`.
    pub rename_primary_page: bool,

    /// Remove an existing output directory before expanding into it.
    pub clean: bool,

    /// Extension of project files, without the leading dot.
    pub extension: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("."),
            dest_root: None,
            layout: OutputLayout::default(),
            preset: Preset::default(),
            failure_policy: FailurePolicy::default(),
            rename_primary_page: true,
            clean: false,
            extension: PROJECT_EXTENSION.to_string(),
        }
    }
}

impl BatchConfig {
    /// Creates a default configuration for `source_root`.
    #[must_use]
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            ..Default::default()
        }
    }

    /// Directory that receives output.
    #[must_use]
    pub fn dest_root(&self) -> &std::path::Path {
        self.dest_root.as_deref().unwrap_or(&self.source_root)
    }

    /// Sets the destination root.
    #[must_use]
    pub fn with_dest_root(mut self, dest_root: impl Into<PathBuf>) -> Self {
        self.dest_root = Some(dest_root.into());
        self
    }

    /// Sets the output layout.
    #[must_use]
    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the packager preset.
    #[must_use]
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Enables or disables renaming the primary page.
    #[must_use]
    pub fn with_rename_primary_page(mut self, rename: bool) -> Self {
        self.rename_primary_page = rename;
        self
    }

    /// Enables or disables cleaning output directories before writing.
    #[must_use]
    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Sets the project file extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_convert_in_place() {
        let config = BatchConfig::default();
        assert_eq!(config.dest_root(), std::path::Path::new("."));
        assert_eq!(config.layout, OutputLayout::Mirrored);
        assert_eq!(config.preset, Preset::ZipResizable);
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
        assert!(config.rename_primary_page);
        assert!(!config.clean);
        assert_eq!(config.extension, "sb3");
    }

    #[test]
    fn test_builder() {
        let config = BatchConfig::new("src")
            .with_dest_root("out")
            .with_layout(OutputLayout::FlatFolder)
            .with_clean(true)
            .with_rename_primary_page(false)
            .with_extension("sb2");
        assert_eq!(config.source_root, PathBuf::from("src"));
        assert_eq!(config.dest_root(), std::path::Path::new("out"));
        assert!(config.clean);
        assert!(!config.rename_primary_page);
        assert_eq!(config.extension, "sb2");
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("flat".parse::<OutputLayout>().unwrap(), OutputLayout::FlatFolder);
        assert_eq!("Single".parse::<OutputLayout>().unwrap(), OutputLayout::SingleFile);
        assert_eq!("mirrored".parse::<OutputLayout>().unwrap(), OutputLayout::Mirrored);
        assert!("tree".parse::<OutputLayout>().is_err());
    }

    #[test]
    fn test_failure_policy_flag() {
        assert_eq!(FailurePolicy::from_continue_on_error(true), FailurePolicy::Continue);
        assert_eq!(FailurePolicy::from_continue_on_error(false), FailurePolicy::Abort);
        assert!(!FailurePolicy::Abort.continue_on_error());
    }
}
