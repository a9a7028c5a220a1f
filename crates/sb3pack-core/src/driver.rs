//! Sequential batch conversion.

use std::path::Path;
use std::time::Instant;

use tracing::info;
use tracing::warn;

use crate::BatchConfig;
use crate::FailurePolicy;
use crate::PackError;
use crate::Packager;
use crate::Result;
use crate::discovery::SourceFile;
use crate::job::ConversionJob;
use crate::job::PlannedJob;
use crate::job::plan_jobs;
use crate::report::BatchProgress;
use crate::report::BatchReport;
use crate::report::JobOutcome;
use crate::report::JobStatus;
use crate::report::WriteReport;
use crate::writer::WriteOptions;
use crate::writer::write_artifact;

/// Converts `sources` one at a time, in order.
///
/// Each project is read, handed to `packager` exactly once, and its artifact
/// written to the destination chosen by `config.layout`. A failed job is
/// recorded and, under [`FailurePolicy::Continue`], the batch moves on; under
/// [`FailurePolicy::Abort`] the remaining jobs are left unattempted and the
/// report is marked `aborted`. Failed jobs are never retried.
///
/// # Examples
///
/// ```no_run
/// use sb3pack_core::BatchConfig;
/// use sb3pack_core::CommandPackager;
/// use sb3pack_core::NoopProgress;
/// use sb3pack_core::discovery::discover;
/// use sb3pack_core::run_batch;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = BatchConfig::new("./sb3").with_dest_root("./dist");
/// let sources = discover(&config.source_root, &config.extension)?;
/// let packager = CommandPackager::new("sb3-packager-bridge")?;
/// let report = run_batch(&sources, &config, &packager, &mut NoopProgress);
/// println!("{} of {} converted", report.succeeded(), report.attempted());
/// # Ok(())
/// # }
/// ```
pub fn run_batch<P, G>(
    sources: &[SourceFile],
    config: &BatchConfig,
    packager: &P,
    progress: &mut G,
) -> BatchReport
where
    P: Packager + ?Sized,
    G: BatchProgress + ?Sized,
{
    let start = Instant::now();
    let planned = plan_jobs(sources, config);
    let total = planned.len();
    let options = WriteOptions {
        clean: config.clean,
    };

    let mut report = BatchReport {
        discovered: total,
        ..BatchReport::new()
    };

    for (index, planned) in planned.iter().enumerate() {
        let job = planned.job();
        let source = job.source.path();
        let destination = job.destination.root();
        progress.on_job_start(source, total, index + 1);
        info!(
            source = %source.display(),
            destination = %destination.display(),
            "packaging project"
        );

        let result = match planned {
            PlannedJob::Ready(job) => convert(job, sources, config, packager, &options),
            PlannedJob::Collision(_) => Err(PackError::DestinationCollision {
                path: destination.to_path_buf(),
            }),
        };

        let status = match result {
            Ok(write_report) => {
                progress.on_job_success(source, destination, &write_report);
                JobStatus::Succeeded(write_report)
            }
            Err(err) => {
                warn!(source = %source.display(), error = %err, "failed to package project");
                progress.on_job_failure(source, &err);
                JobStatus::Failed(err.to_string())
            }
        };

        let failed = matches!(status, JobStatus::Failed(_));
        report.outcomes.push(JobOutcome {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            status,
        });

        if failed && config.failure_policy == FailurePolicy::Abort {
            report.aborted = index + 1 < total;
            if report.aborted {
                warn!(remaining = total - index - 1, "stopping batch after failure");
            }
            break;
        }
    }

    report.duration = start.elapsed();
    progress.on_complete(&report);
    report
}

/// Runs one job: read, package, write.
fn convert<P>(
    job: &ConversionJob,
    sources: &[SourceFile],
    config: &BatchConfig,
    packager: &P,
    options: &WriteOptions,
) -> Result<WriteReport>
where
    P: Packager + ?Sized,
{
    if options.clean {
        check_clean_target(job.destination.root(), sources, &config.source_root)?;
    }

    let path = job.source.path();
    let project = std::fs::read(path).map_err(|source| PackError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let artifact = packager.pack(&project, config.preset)?;
    write_artifact(&artifact, &job.destination, options)
}

/// Rejects cleaning a directory that holds a discovered project, or that is
/// the source root or one of its ancestors.
fn check_clean_target(root: &Path, sources: &[SourceFile], source_root: &Path) -> Result<()> {
    // Nothing on disk yet, so cleaning removes nothing.
    let Ok(root) = root.canonicalize() else {
        return Ok(());
    };
    let source_root = source_root
        .canonicalize()
        .unwrap_or_else(|_| source_root.to_path_buf());

    let holds_input =
        source_root.starts_with(&root) || sources.iter().any(|s| s.path().starts_with(&root));
    if holds_input {
        return Err(PackError::ProtectedDestination { path: root });
    }
    Ok(())
}
