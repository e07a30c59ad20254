//! Process execution capability used by lifecycle hooks and platform
//! identification.
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Output};

/// Result of a command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Captured standard output (empty for [`Executor::call`]).
    pub stdout: String,
    /// Captured standard error (empty for [`Executor::call`]).
    pub stderr: String,
    /// Whether the process exited successfully.
    pub success: bool,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

impl From<ExitStatus> for ExecResult {
    fn from(status: ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
            ..Self::default()
        }
    }
}

/// Working directory and extra environment for a command.
#[derive(Debug, Clone, Default)]
pub struct CallOpts {
    /// Directory to run in; inherits the current one when `None`.
    pub cwd: Option<PathBuf>,
    /// Variables added to the inherited environment.
    pub env: Vec<(String, String)>,
}

/// Runs external programs.
///
/// A non-zero exit is reported through [`ExecResult::success`]; only a
/// failure to spawn is an `Err`.
pub trait Executor: Send + Sync {
    /// Run a program with inherited stdio.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned.
    fn call(&self, program: &str, args: &[&str], opts: &CallOpts) -> Result<ExecResult>;

    /// Run a program and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned.
    fn capture(&self, program: &str, args: &[&str], opts: &CallOpts) -> Result<ExecResult>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    fn command(program: &str, args: &[&str], opts: &CallOpts) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = &opts.cwd {
            cmd.current_dir(dir);
        }
        for (k, v) in &opts.env {
            cmd.env(k, v);
        }
        cmd
    }
}

impl Executor for SystemExecutor {
    fn call(&self, program: &str, args: &[&str], opts: &CallOpts) -> Result<ExecResult> {
        let status = Self::command(program, args, opts)
            .status()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(status))
    }

    fn capture(&self, program: &str, args: &[&str], opts: &CallOpts) -> Result<ExecResult> {
        let output = Self::command(program, args, opts)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(output))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
