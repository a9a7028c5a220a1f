//! Error conversion utilities for CLI.
//!
//! Converts sb3pack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use sb3pack_core::BatchReport;
use sb3pack_core::PackError;
use std::path::Path;

/// Converts a `PackError` raised before any project is processed into an
/// anyhow error with a hint.
pub fn convert_pack_error(err: PackError, source_root: &Path) -> anyhow::Error {
    match err {
        PackError::Discovery { path, reason } => {
            anyhow!(
                "Cannot search '{}' for projects: {}\n\
                 HINT: Pass the directory that contains your project files as SOURCE.",
                path.display(),
                reason
            )
        }
        PackError::Packaging { reason } => {
            anyhow!(
                "Packager setup failed: {reason}\n\
                 HINT: Point --packager (or SB3PACK_PACKAGER) at the packager bridge program."
            )
        }
        other => anyhow!("Failed to process '{}': {}", source_root.display(), other),
    }
}

/// Returns a hint for the batch when its failures share a recognizable cause.
pub fn batch_hint(report: &BatchReport) -> Option<&'static str> {
    let mut failures = report.failures().filter_map(|o| o.error()).peekable();
    failures.peek()?;

    let reasons: Vec<&str> = failures.collect();
    if reasons.iter().all(|r| r.contains("cannot start packager")) {
        Some("The packager could not be started. Check --packager or SB3PACK_PACKAGER.")
    } else if reasons.iter().any(|r| r.contains("did not finish within")) {
        Some("Large projects may need a longer --timeout.")
    } else if reasons.iter().any(|r| r.contains("already claimed")) {
        Some(
            "Two projects mapped to the same or nested output folders. \
             Rename one of them, or try --layout mirrored for same-named projects.",
        )
    } else if reasons.iter().any(|r| r.contains("refusing to clean")) {
        Some("Folders holding input projects are never cleaned. Pass a separate DEST with --clean.")
    } else {
        None
    }
}

/// Summarizes a batch that did not fully succeed.
pub fn batch_failure(report: &BatchReport) -> anyhow::Error {
    if report.aborted {
        anyhow!(
            "Batch stopped after a failure; {} of {} projects were not attempted",
            report.skipped(),
            report.discovered
        )
    } else {
        anyhow!(
            "{} of {} projects failed to package",
            report.failed(),
            report.attempted()
        )
    }
}
