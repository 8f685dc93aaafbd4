//! Running the external formatter.
//!
//! The formatter is a black box: `<exe> [...args] <document>` prints the
//! formatted document on stdout, `<exe> --version` prints its version. Any
//! non-zero exit is a failure whose stderr is reported verbatim.

use crate::error::{FormatError, FormatResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;

/// Flag passed to the formatter for the version probe.
pub const VERSION_FLAG: &str = "--version";

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Convert into stdout text, mapping failure to [`FormatError::ProcessFailed`].
    ///
    /// The failure details are stderr when it has content, otherwise a short
    /// description of the exit status.
    pub fn into_stdout(self, program: &Path) -> FormatResult<String> {
        if !self.success() {
            let stderr = String::from_utf8_lossy(&self.stderr);
            let details = if stderr.trim().is_empty() {
                match self.status {
                    Some(code) => format!("{} exited with status {}", program.display(), code),
                    None => format!("{} was terminated by a signal", program.display()),
                }
            } else {
                stderr.into_owned()
            };
            return Err(FormatError::ProcessFailed { details });
        }

        String::from_utf8(self.stdout).map_err(FormatError::InvalidOutput)
    }
}

/// Spawns a program and waits for it to finish.
#[async_trait]
pub trait ProcessRunner: Send + Sync + std::fmt::Debug {
    async fn run(&self, program: &Path, args: &[String]) -> FormatResult<ProcessOutput>;
}

/// [`ProcessRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, program: &Path, args: &[String]) -> FormatResult<ProcessOutput> {
        tracing::debug!(program = %program.display(), ?args, "Spawning formatter");

        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| FormatError::Spawn {
                program: program.to_path_buf(),
                source: e,
            })?;

        Ok(ProcessOutput {
            status: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Build the argument list for formatting `document`: configured arguments
/// first, document path last.
pub fn format_args(configured: &[String], document: &Path) -> Vec<String> {
    let mut args = Vec::with_capacity(configured.len() + 1);
    args.extend(configured.iter().cloned());
    args.push(document.to_string_lossy().into_owned());
    args
}

/// Run the formatter on `document` and return its stdout.
pub async fn run_formatter(
    runner: &dyn ProcessRunner,
    executable: &Path,
    configured: &[String],
    document: &Path,
) -> FormatResult<String> {
    let args = format_args(configured, document);
    runner.run(executable, &args).await?.into_stdout(executable)
}

/// Ask the formatter for its version. Returns the trimmed stdout.
pub async fn probe_version(runner: &dyn ProcessRunner, executable: &Path) -> FormatResult<String> {
    let output = runner
        .run(executable, &[VERSION_FLAG.to_string()])
        .await?
        .into_stdout(executable)?;
    Ok(output.trim().to_string())
}
