//! Batch conversion of Scratch project archives into standalone web artifacts.
//!
//! `sb3pack-core` finds `.sb3` project files under a directory, hands each
//! one to an external packager, and writes the resulting HTML page or zip of
//! page + assets to disk, laid out flat, as single files, or mirroring the
//! source tree.
//!
//! # Examples
//!
//! ```no_run
//! use sb3pack_core::BatchConfig;
//! use sb3pack_core::CommandPackager;
//! use sb3pack_core::NoopProgress;
//! use sb3pack_core::discover;
//! use sb3pack_core::run_batch;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BatchConfig::new("./sb3").with_dest_root("./dist");
//! let sources = discover(&config.source_root, &config.extension)?;
//! let packager = CommandPackager::new("sb3-packager-bridge")?;
//! let report = run_batch(&sources, &config, &packager, &mut NoopProgress);
//! println!("{} converted, {} failed", report.succeeded(), report.failed());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod job;
pub mod packager;
pub mod preset;
pub mod report;
#[doc(hidden)]
pub mod test_utils;
pub mod writer;

// Re-export main API types
pub use config::BatchConfig;
pub use config::FailurePolicy;
pub use config::OutputLayout;
pub use discovery::SourceFile;
pub use discovery::discover;
pub use driver::run_batch;
pub use error::PackError;
pub use error::Result;
pub use job::ConversionJob;
pub use job::Destination;
pub use packager::CommandPackager;
pub use packager::PackagedArtifact;
pub use packager::Packager;
pub use preset::Preset;
pub use report::BatchProgress;
pub use report::BatchReport;
pub use report::JobOutcome;
pub use report::JobStatus;
pub use report::NoopProgress;
pub use report::WriteReport;
pub use writer::write_artifact;
