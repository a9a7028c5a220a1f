//! Batch progress reporting for the pack command.

use crate::output::OutputFormatter;
use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use sb3pack_core::BatchProgress;
use sb3pack_core::BatchReport;
use sb3pack_core::PackError;
use sb3pack_core::WriteReport;
use std::path::Path;

/// Forwards batch events to the output formatter and, on a TTY, drives a
/// progress bar over the projects.
///
/// Formatter lines are printed above the bar so the two never interleave.
pub struct CliProgress<'a> {
    formatter: &'a dyn OutputFormatter,
    bar: Option<ProgressBar>,
    completed: usize,
}

impl<'a> CliProgress<'a> {
    /// Creates a progress observer for `total` projects.
    ///
    /// # Arguments
    ///
    /// * `formatter` - Receives per-project lines
    /// * `total` - Number of projects in the batch
    /// * `show_bar` - Whether to draw the progress bar
    #[must_use]
    pub fn new(formatter: &'a dyn OutputFormatter, total: usize, show_bar: bool) -> Self {
        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(total as u64);
            // Template: "pong.sb3 [████████░░░░] 3/7 projects (12s)"
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} projects ({elapsed})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▓░"),
            );
            bar
        });

        Self {
            formatter,
            bar,
            completed: 0,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }

    fn emit(&self, f: impl FnOnce()) {
        match &self.bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }

    fn advance(&mut self) {
        self.completed += 1;
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }
}

impl Drop for CliProgress<'_> {
    fn drop(&mut self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl BatchProgress for CliProgress<'_> {
    fn on_job_start(&mut self, source: &Path, total: usize, current: usize) {
        if let Some(bar) = &self.bar {
            let name = source
                .file_name()
                .map_or_else(|| source.display().to_string(), |n| n.to_string_lossy().into_owned());
            bar.set_message(name);
        }
        self.emit(|| self.formatter.format_job_start(source, current, total));
    }

    fn on_job_success(&mut self, source: &Path, destination: &Path, report: &WriteReport) {
        self.emit(|| self.formatter.format_job_success(source, destination, report));
        self.advance();
    }

    fn on_job_failure(&mut self, source: &Path, error: &PackError) {
        self.emit(|| self.formatter.format_job_failure(source, error));
        self.advance();
    }

    fn on_complete(&mut self, _report: &BatchReport) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
