//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::error::batch_hint;
use anyhow::Result;
use console::Term;
use console::style;
use sb3pack_core::BatchReport;
use sb3pack_core::PackError;
use sb3pack_core::SourceFile;
use sb3pack_core::WriteReport;
use std::path::Path;
use std::time::Duration;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_duration(duration: Duration) -> String {
        let millis = duration.as_millis();
        if millis >= 1000 {
            format!("{:.1}s", duration.as_secs_f64())
        } else {
            format!("{millis}ms")
        }
    }

    fn mark(&self, symbol: &str, color: console::Color) -> String {
        if self.use_colors {
            style(symbol).fg(color).bold().to_string()
        } else {
            symbol.to_string()
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_job_start(&self, source: &Path, current: usize, total: usize) {
        if self.quiet {
            return;
        }
        let _ = self.term.write_line(&format!(
            "[{current}/{total}] Packaging {}",
            source.display()
        ));
    }

    fn format_job_success(&self, _source: &Path, destination: &Path, report: &WriteReport) {
        if !self.quiet {
            let _ = self.term.write_line(&format!(
                "  {} Packaged to {}",
                self.mark("✓", console::Color::Green),
                destination.display()
            ));

            if self.verbose {
                let _ = self.term.write_line(&format!(
                    "    {} files, {}",
                    report.files_written,
                    Self::format_size(report.bytes_written)
                ));
                if let Some(page) = &report.primary_page {
                    let _ = self
                        .term
                        .write_line(&format!("    Page: {}", page.display()));
                }
            }
        }

        for warning in &report.warnings {
            self.format_warning(warning);
        }
    }

    fn format_job_failure(&self, source: &Path, error: &PackError) {
        let _ = self.err_term.write_line(&format!(
            "  {} Failed to package {}: {error}",
            self.mark("✗", console::Color::Red),
            source.display()
        ));
    }

    fn format_batch_report(&self, report: &BatchReport) -> Result<()> {
        if self.quiet && report.is_success() {
            return Ok(());
        }

        let header = if report.is_success() {
            format!("{} Packaging complete", self.mark("✓", console::Color::Green))
        } else if report.aborted {
            format!("{} Packaging stopped", self.mark("✗", console::Color::Red))
        } else {
            format!(
                "{} Packaging finished with failures",
                self.mark("⚠", console::Color::Yellow)
            )
        };
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&header);
        let _ = self
            .term
            .write_line(&format!("  Attempted: {}", report.attempted()));
        let _ = self
            .term
            .write_line(&format!("  Succeeded: {}", report.succeeded()));
        let _ = self
            .term
            .write_line(&format!("  Failed:    {}", report.failed()));
        if report.skipped() > 0 {
            let _ = self
                .term
                .write_line(&format!("  Skipped:   {}", report.skipped()));
        }
        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Duration:  {}",
                Self::format_duration(report.duration)
            ));
        }

        if report.failed() > 0 {
            let _ = self.term.write_line("");
            let _ = self.term.write_line("Failures:");
            for outcome in report.failures() {
                let _ = self.term.write_line(&format!(
                    "  - {}: {}",
                    outcome.source.display(),
                    outcome.error().unwrap_or_default()
                ));
            }
            if let Some(hint) = batch_hint(report) {
                let _ = self.term.write_line(&format!("HINT: {hint}"));
            }
        }

        Ok(())
    }

    fn format_discovered(&self, root: &Path, sources: &[SourceFile]) -> Result<()> {
        for source in sources {
            if self.verbose {
                let _ = self.term.write_line(&source.path().display().to_string());
            } else {
                let _ = self
                    .term
                    .write_line(&source.relative_path().display().to_string());
            }
        }

        if !self.quiet {
            let noun = if sources.len() == 1 { "project" } else { "projects" };
            let _ = self.term.write_line(&format!(
                "{} {noun} found under {}",
                sources.len(),
                root.display()
            ));
        }

        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        let _ = self.err_term.write_line(&format!(
            "{} {message}",
            self.mark("⚠", console::Color::Yellow)
        ));
    }
}
