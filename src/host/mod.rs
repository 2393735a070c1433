//! Host module for command execution in the local shell

mod shell;

pub use shell::{CommandExecutor, ExecError, ExecOutcome, ShellExecutor};
