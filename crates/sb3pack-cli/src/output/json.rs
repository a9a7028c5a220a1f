//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use crate::error::batch_failure;
use anyhow::Result;
use sb3pack_core::BatchReport;
use sb3pack_core::JobStatus;
use sb3pack_core::PackError;
use sb3pack_core::SourceFile;
use sb3pack_core::WriteReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct JobOutput {
    source: String,
    destination: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_page: Option<String>,
    files_written: usize,
    bytes_written: u64,
    warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
struct BatchOutput {
    discovered: usize,
    attempted: usize,
    succeeded: usize,
    failed: usize,
    skipped: usize,
    aborted: bool,
    duration_ms: u128,
    jobs: Vec<JobOutput>,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn batch_output(report: &BatchReport) -> BatchOutput {
        let jobs = report
            .outcomes
            .iter()
            .map(|outcome| {
                let (status, error, written) = match &outcome.status {
                    JobStatus::Succeeded(w) => ("succeeded", None, Some(w)),
                    JobStatus::Failed(e) => ("failed", Some(e.clone()), None),
                };
                JobOutput {
                    source: outcome.source.display().to_string(),
                    destination: outcome.destination.display().to_string(),
                    status,
                    error,
                    primary_page: written
                        .and_then(|w| w.primary_page.as_ref())
                        .map(|p| p.display().to_string()),
                    files_written: written.map_or(0, |w| w.files_written),
                    bytes_written: written.map_or(0, |w| w.bytes_written),
                    warnings: written.map(|w| w.warnings.clone()).unwrap_or_default(),
                }
            })
            .collect();

        BatchOutput {
            discovered: report.discovered,
            attempted: report.attempted(),
            succeeded: report.succeeded(),
            failed: report.failed(),
            skipped: report.skipped(),
            aborted: report.aborted,
            duration_ms: report.duration.as_millis(),
            jobs,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    // Per-job events are folded into the final document.
    fn format_job_start(&self, _source: &Path, _current: usize, _total: usize) {}

    fn format_job_success(&self, _source: &Path, _destination: &Path, _report: &WriteReport) {}

    fn format_job_failure(&self, _source: &Path, _error: &PackError) {}

    fn format_batch_report(&self, report: &BatchReport) -> Result<()> {
        let data = Self::batch_output(report);
        if report.is_success() {
            Self::output(&JsonOutput::success("pack", data))
        } else {
            let message = batch_failure(report).to_string();
            Self::output(&JsonOutput::partial("pack", data, message))
        }
    }

    fn format_discovered(&self, root: &Path, sources: &[SourceFile]) -> Result<()> {
        #[derive(Serialize)]
        struct ProjectEntry {
            path: String,
            relative_path: String,
            name: String,
        }

        #[derive(Serialize)]
        struct ListOutput {
            root: String,
            count: usize,
            projects: Vec<ProjectEntry>,
        }

        let data = ListOutput {
            root: root.display().to_string(),
            count: sources.len(),
            projects: sources
                .iter()
                .map(|s| ProjectEntry {
                    path: s.path().display().to_string(),
                    relative_path: s.relative_path().display().to_string(),
                    name: s.base_name(),
                })
                .collect(),
        };

        Self::output(&JsonOutput::success("list", data))
    }

    fn format_warning(&self, _message: &str) {
        // Warnings are carried inside the final document.
    }
}
