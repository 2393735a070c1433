//! Shell Executor
//!
//! Executes relayed command strings in the host shell with output capture.
//! On Windows this is `cmd /C`, elsewhere `sh -c`. Commands are
//! fire-and-forget from the relay's perspective: there is no per-command
//! timeout, and a hanging command stalls the processor thread.

use std::path::PathBuf;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

#[cfg(windows)]
const SHELL_BINARY: &str = "cmd";
#[cfg(windows)]
const SHELL_FLAG: &str = "/C";

#[cfg(not(windows))]
const SHELL_BINARY: &str = "sh";
#[cfg(not(windows))]
const SHELL_FLAG: &str = "-c";

/// Result of executing one relayed command
#[derive(Debug, Clone, Default)]
pub struct ExecOutcome {
    /// Captured stdout text
    pub stdout: String,
    /// Captured stderr text (may be non-empty even on success)
    pub stderr: String,
    /// Exit code if the process reported one
    pub exit_code: Option<i32>,
}

/// Command execution errors
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("host shell '{0}' not found. Install it or add to PATH.")]
    ShellNotFound(String),

    #[error("failed to launch process: {0}")]
    LaunchFailed(String),

    #[error("command exited with status {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
}

/// The seam between the relay's processor and the actual host side.
///
/// Tests substitute a recording implementation; production uses
/// [`ShellExecutor`].
pub trait CommandExecutor {
    fn execute(&self, command: &str) -> Result<ExecOutcome, ExecError>;
}

/// Executes command strings in the host shell
pub struct ShellExecutor {
    shell: PathBuf,
}

impl ShellExecutor {
    /// Resolve the host shell from PATH.
    pub fn new() -> Result<Self, ExecError> {
        let shell = which::which(SHELL_BINARY)
            .map_err(|_| ExecError::ShellNotFound(SHELL_BINARY.to_string()))?;
        debug!(shell = %shell.display(), "resolved host shell");
        Ok(Self { shell })
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute(&self, command: &str) -> Result<ExecOutcome, ExecError> {
        let output = Command::new(&self.shell)
            .arg(SHELL_FLAG)
            .arg(command)
            .output()
            .map_err(|e| ExecError::LaunchFailed(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let exit_code = output.status.code();

        if !output.status.success() {
            return Err(ExecError::NonZeroExit {
                code: exit_code.unwrap_or(-1),
                stderr,
            });
        }

        Ok(ExecOutcome {
            stdout,
            stderr,
            exit_code,
        })
    }
}
