//! Output formatter trait for CLI results.

use anyhow::Result;
use sb3pack_core::BatchReport;
use sb3pack_core::PackError;
use sb3pack_core::SourceFile;
use sb3pack_core::WriteReport;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Announce that a project is about to be packaged
    fn format_job_start(&self, source: &Path, current: usize, total: usize);

    /// Report a project written to its destination
    fn format_job_success(&self, source: &Path, destination: &Path, report: &WriteReport);

    /// Report a project that failed
    fn format_job_failure(&self, source: &Path, error: &PackError);

    /// Format the summary of a whole batch
    fn format_batch_report(&self, report: &BatchReport) -> Result<()>;

    /// Format the projects found by discovery
    fn format_discovered(&self, root: &Path, sources: &[SourceFile]) -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    /// Error output that still carries the partial results.
    pub fn partial(operation: impl Into<String>, data: T, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: Some(data),
            error: Some(error.into()),
        }
    }
}
