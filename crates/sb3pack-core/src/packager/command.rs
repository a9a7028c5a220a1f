//! Packager backed by an external program.
//!
//! The program is a bridge to the real packager library. It receives the
//! project bytes on stdin and the preset as arguments, and must write the
//! artifact bytes to stdout:
//!
//! ```text
//! <program> <args...> --preset <name> --environment <html|zip> --stage <none|dynamicResize>
//! ```
//!
//! A non-zero exit status is a packaging failure; the tail of stderr becomes
//! the reported reason.

use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::runtime::Runtime;
use tracing::debug;

use super::PackagedArtifact;
use super::Packager;
use crate::PackError;
use crate::Preset;
use crate::Result;

/// Default per-call limit for the external packager.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Longest stderr excerpt carried into an error.
const STDERR_EXCERPT: usize = 2048;

/// Runs an external packager bridge once per project.
///
/// # Examples
///
/// ```no_run
/// use sb3pack_core::CommandPackager;
/// use sb3pack_core::Packager;
/// use sb3pack_core::Preset;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let packager = CommandPackager::new("sb3-packager-bridge")?
///     .with_timeout(Duration::from_secs(60));
/// let artifact = packager.pack(&std::fs::read("game.sb3")?, Preset::Html)?;
/// println!("{} bytes", artifact.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CommandPackager {
    program: OsString,
    args: Vec<OsString>,
    timeout: Duration,
    runtime: Runtime,
}

impl CommandPackager {
    /// Creates a packager that runs `program` with no extra arguments.
    ///
    /// # Errors
    ///
    /// Returns `PackError::Io` if the async runtime cannot be created.
    pub fn new(program: impl Into<OsString>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            runtime,
        })
    }

    /// Sets arguments placed before the preset arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the per-call time limit.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured time limit.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command(&self, preset: Preset) -> Command {
        let options = preset.options();
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--preset")
            .arg(preset.name())
            .arg("--environment")
            .arg(options.environment.as_str())
            .arg("--stage")
            .arg(options.stage.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn run(&self, project: &[u8], preset: Preset) -> Result<Vec<u8>> {
        let program = self.program.to_string_lossy().into_owned();
        let mut child = self.command(preset).spawn().map_err(|e| PackError::Packaging {
            reason: format!("cannot start packager '{program}': {e}"),
        })?;

        // Feed stdin from a separate task so a chatty packager cannot
        // deadlock on a full stdout pipe.
        let stdin = child.stdin.take();
        let input = project.to_vec();
        let feeder = tokio::spawn(async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&input).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        });

        // Dropping the future on expiry drops the child, which kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| PackError::PackagerTimeout {
                timeout: self.timeout,
            })??;

        match feeder.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(error = %e, "packager closed stdin early"),
            Err(e) => debug!(error = %e, "stdin feeder task failed"),
        }

        if !output.status.success() {
            return Err(PackError::Packaging {
                reason: failure_reason(&program, output.status, &output.stderr),
            });
        }

        debug!(
            program = %program,
            preset = %preset,
            bytes = output.stdout.len(),
            "packager finished"
        );
        Ok(output.stdout)
    }
}

impl Packager for CommandPackager {
    fn pack(&self, project: &[u8], preset: Preset) -> Result<PackagedArtifact> {
        let stdout = self.runtime.block_on(self.run(project, preset))?;
        PackagedArtifact::from_output(stdout, preset)
    }
}

fn failure_reason(program: &str, status: std::process::ExitStatus, stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim();
    let excerpt = if stderr.len() > STDERR_EXCERPT {
        let mut start = stderr.len() - STDERR_EXCERPT;
        while !stderr.is_char_boundary(start) {
            start += 1;
        }
        &stderr[start..]
    } else {
        stderr
    };

    if excerpt.is_empty() {
        format!("packager '{program}' exited with {status}")
    } else {
        format!("packager '{program}' exited with {status}: {excerpt}")
    }
}
