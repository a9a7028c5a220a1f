//! Write and batch reporting.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::PackError;

/// Report of materializing one artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Number of files written.
    pub files_written: usize,

    /// Number of directory entries created.
    pub directories_created: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Final location of the primary page, when the artifact has one.
    pub primary_page: Option<PathBuf>,

    /// Non-fatal problems, such as a missing primary page.
    pub warnings: Vec<String>,
}

impl WriteReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Result of one job in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Artifact written.
    Succeeded(WriteReport),
    /// The job failed with the given reason.
    Failed(String),
}

/// Outcome of one attempted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    /// Project archive.
    pub source: PathBuf,
    /// Destination root the job targeted.
    pub destination: PathBuf,
    /// What happened.
    pub status: JobStatus,
}

impl JobOutcome {
    /// Returns `true` if the artifact was written.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self.status, JobStatus::Succeeded(_))
    }

    /// Failure reason, if the job failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            JobStatus::Failed(reason) => Some(reason),
            JobStatus::Succeeded(_) => None,
        }
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of projects discovered.
    pub discovered: usize,

    /// Per-job outcomes, in processing order.
    pub outcomes: Vec<JobOutcome>,

    /// Whether the batch stopped early under the abort policy.
    pub aborted: bool,

    /// Wall-clock duration of the batch.
    pub duration: Duration,
}

impl BatchReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of jobs whose artifact was written.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    /// Number of failed jobs.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    /// Number of discovered projects never attempted.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.discovered.saturating_sub(self.attempted())
    }

    /// Returns `true` if every discovered project was converted.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.aborted && self.failed() == 0 && self.skipped() == 0
    }

    /// Iterates over failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    /// Total number of warnings across successful jobs.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match &o.status {
                JobStatus::Succeeded(report) => report.warnings.len(),
                JobStatus::Failed(_) => 0,
            })
            .sum()
    }
}

/// Callback trait for per-job progress during a batch.
///
/// # Examples
///
/// ```
/// use sb3pack_core::BatchProgress;
/// use sb3pack_core::BatchReport;
/// use sb3pack_core::PackError;
/// use sb3pack_core::WriteReport;
/// use std::path::Path;
///
/// struct Printer;
///
/// impl BatchProgress for Printer {
///     fn on_job_start(&mut self, source: &Path, total: usize, current: usize) {
///         println!("[{current}/{total}] {}", source.display());
///     }
///
///     fn on_job_success(&mut self, _source: &Path, destination: &Path, _report: &WriteReport) {
///         println!("  -> {}", destination.display());
///     }
///
///     fn on_job_failure(&mut self, _source: &Path, error: &PackError) {
///         println!("  failed: {error}");
///     }
///
///     fn on_complete(&mut self, report: &BatchReport) {
///         println!("{} of {} converted", report.succeeded(), report.attempted());
///     }
/// }
/// ```
pub trait BatchProgress {
    /// Called before a job is processed.
    ///
    /// # Arguments
    ///
    /// * `source` - Project being converted
    /// * `total` - Number of discovered projects
    /// * `current` - Position of this job (1-indexed)
    fn on_job_start(&mut self, source: &Path, total: usize, current: usize);

    /// Called after an artifact has been written.
    fn on_job_success(&mut self, source: &Path, destination: &Path, report: &WriteReport);

    /// Called when a job fails.
    fn on_job_failure(&mut self, source: &Path, error: &PackError);

    /// Called once after the last job.
    fn on_complete(&mut self, report: &BatchReport);
}

/// No-op implementation of `BatchProgress`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl BatchProgress for NoopProgress {
    fn on_job_start(&mut self, _source: &Path, _total: usize, _current: usize) {}

    fn on_job_success(&mut self, _source: &Path, _destination: &Path, _report: &WriteReport) {}

    fn on_job_failure(&mut self, _source: &Path, _error: &PackError) {}

    fn on_complete(&mut self, _report: &BatchReport) {}
}
