//! Shared plumbing for launching external programs.

use std::ffi::OsStr;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use chatsh_core::collaborator::{CollaboratorError, CollaboratorResult};

/// Upper bound on one external action unless configured otherwise.
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(120);

/// Environment applied to every launched program.
#[derive(Debug, Clone)]
pub struct ProcessEnv {
    /// Value for `DISPLAY`, when a graphical session is configured
    pub display: Option<String>,
    /// A program still running after this long is killed
    pub timeout: Duration,
}

impl Default for ProcessEnv {
    fn default() -> Self {
        Self {
            display: None,
            timeout: DEFAULT_ACTION_TIMEOUT,
        }
    }
}

impl ProcessEnv {
    pub fn with_display(display: Option<String>) -> Self {
        Self {
            display,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds a command for `program` with this environment applied.
    pub fn command<S: AsRef<OsStr>>(&self, program: S) -> Command {
        let mut cmd = Command::new(program);
        if let Some(display) = &self.display {
            cmd.env("DISPLAY", display);
        }
        cmd.kill_on_drop(true);
        cmd
    }

    /// Runs `cmd` like [`run_command`], killing it once the timeout elapses.
    pub async fn run(&self, cmd: Command, stdin: Option<&str>) -> CollaboratorResult<Output> {
        let program = cmd.as_std().get_program().to_string_lossy().into_owned();
        match tokio::time::timeout(self.timeout, run_command(cmd, stdin)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(program = %program, timeout = ?self.timeout, "Process timed out and was killed");
                Err(CollaboratorError::Failed(format!(
                    "{} timed out after {:?}",
                    program, self.timeout
                )))
            }
        }
    }
}

/// Runs `cmd` to completion, optionally writing `stdin` first.
///
/// A program that cannot be found maps to [`CollaboratorError::Unavailable`].
pub async fn run_command(mut cmd: Command, stdin: Option<&str>) -> CollaboratorResult<Output> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    cmd.stdin(if stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });

    let program = cmd.as_std().get_program().to_string_lossy().into_owned();
    let mut child = cmd.spawn().map_err(|e| spawn_error(&program, e))?;

    if let Some(input) = stdin
        && let Some(mut pipe) = child.stdin.take()
    {
        let line = format!("{}\n", input);
        match pipe.write_all(line.as_bytes()).await {
            Ok(()) => {}
            // The program exited without reading its input.
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                debug!(program = %program, "Stdin closed early");
            }
            Err(e) => return Err(e.into()),
        }
        drop(pipe);
    }

    let output = child.wait_with_output().await?;
    debug!(program = %program, status = ?output.status.code(), "Process finished");
    Ok(output)
}

/// Stdout followed by stderr, decoded lossily.
pub fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

/// Fails with the combined output when the program exited unsuccessfully.
pub fn require_success(program: &str, output: &Output) -> CollaboratorResult<()> {
    if output.status.success() {
        return Ok(());
    }
    let detail = combined_output(output);
    let detail = detail.trim();
    Err(CollaboratorError::Failed(if detail.is_empty() {
        format!("{} exited with {}", program, output.status)
    } else {
        detail.to_string()
    }))
}

fn spawn_error(program: &str, e: std::io::Error) -> CollaboratorError {
    if e.kind() == std::io::ErrorKind::NotFound {
        CollaboratorError::Unavailable(format!("{} not found in PATH", program))
    } else {
        CollaboratorError::Io(format!("failed to start {}: {}", program, e))
    }
}

/// Splits a configured argv into program and arguments.
pub fn split_argv<'a>(
    argv: &'a [String],
    what: &'static str,
) -> CollaboratorResult<(&'a str, &'a [String])> {
    match argv.split_first() {
        Some((program, args)) if !program.trim().is_empty() => Ok((program.as_str(), args)),
        _ => Err(CollaboratorError::NotConfigured(what)),
    }
}
