//! Named packager option sets.
//!
//! The packager exposes a large option surface. This crate only ever selects
//! one of a small, closed set of presets and passes the resulting options
//! through without interpreting them.

use std::fmt;
use std::str::FromStr;

/// Output environment requested from the packager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// A single self-contained HTML document.
    Html,
    /// A zip holding an HTML page and its assets.
    Zip,
}

impl Environment {
    /// Name understood by the packager.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Zip => "zip",
        }
    }
}

/// Stage sizing mode requested from the packager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageMode {
    /// Fixed-size stage.
    Fixed,
    /// Stage that follows the browser window size.
    DynamicResize,
}

impl StageMode {
    /// Name understood by the packager.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "none",
            Self::DynamicResize => "dynamicResize",
        }
    }
}

/// Options handed to the packager for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackagerOptions {
    /// Output environment.
    pub environment: Environment,
    /// Stage sizing.
    pub stage: StageMode,
}

/// Closed set of packager configurations.
///
/// # Examples
///
/// ```
/// use sb3pack_core::Preset;
///
/// let preset: Preset = "zip-resizable".parse().unwrap();
/// assert_eq!(preset, Preset::ZipResizable);
/// assert!(preset.produces_archive());
/// assert_eq!(preset.output_extension(), "zip");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preset {
    /// Zip of page + assets with a window-sized stage.
    #[default]
    ZipResizable,
    /// Zip of page + assets with a fixed stage.
    Zip,
    /// Single HTML document with a fixed stage.
    Html,
    /// Single HTML document with a window-sized stage.
    HtmlResizable,
}

impl Preset {
    /// Every preset, in display order.
    pub const ALL: [Self; 4] = [Self::ZipResizable, Self::Zip, Self::Html, Self::HtmlResizable];

    /// Kebab-case preset name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ZipResizable => "zip-resizable",
            Self::Zip => "zip",
            Self::Html => "html",
            Self::HtmlResizable => "html-resizable",
        }
    }

    /// Packager options this preset stands for.
    #[must_use]
    pub const fn options(self) -> PackagerOptions {
        match self {
            Self::ZipResizable => PackagerOptions {
                environment: Environment::Zip,
                stage: StageMode::DynamicResize,
            },
            Self::Zip => PackagerOptions {
                environment: Environment::Zip,
                stage: StageMode::Fixed,
            },
            Self::Html => PackagerOptions {
                environment: Environment::Html,
                stage: StageMode::Fixed,
            },
            Self::HtmlResizable => PackagerOptions {
                environment: Environment::Html,
                stage: StageMode::DynamicResize,
            },
        }
    }

    /// Whether the packager returns a zip for this preset.
    #[must_use]
    pub const fn produces_archive(self) -> bool {
        matches!(self.options().environment, Environment::Zip)
    }

    /// File extension used when the artifact is written as a single file.
    #[must_use]
    pub const fn output_extension(self) -> &'static str {
        if self.produces_archive() { "zip" } else { "html" }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown preset name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPreset(pub String);

impl fmt::Display for UnknownPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Preset::ALL.iter().map(|p| p.name()).collect();
        write!(
            f,
            "unknown preset '{}' (expected one of: {})",
            self.0,
            names.join(", ")
        )
    }
}

impl std::error::Error for UnknownPreset {}

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}
