//! Command execution utilities
//!
//! This module provides a unified interface for running external programs from task
//! actions (shell commands, scripts, executable with args) with consistent error
//! reporting. Failures keep the child's exit code so it can become the process exit
//! code of the whole run.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};

use anyhow::Context;
use thiserror::Error;
use tracing::debug;

/// An external command finished with a non-zero exit code.
#[derive(Debug, Clone, Error)]
#[error("Command '{command}' failed with exit code {exit_code}")]
pub struct CommandError {
    pub command: String,
    pub exit_code: i32,
}

/// A child process ended unsuccessfully; carries the raw OS status.
#[derive(Debug, Clone, Error)]
#[error("Command '{command}' ended with {status}")]
pub struct ExitStatusError {
    pub command: String,
    pub status: ExitStatus,
}

impl ExitStatusError {
    /// The OS exit code, or 1 when the process was terminated by a signal.
    pub fn exit_code(&self) -> i32 {
        self.status.code().unwrap_or(1)
    }
}

/// Output captured from a command that was not echoed to the console.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Turn an unsuccessful status into an [`ExitStatusError`].
///
/// For callers that drive [`std::process::Command`] themselves.
pub fn ensure_success(command: &str, status: ExitStatus) -> Result<(), ExitStatusError> {
    if status.success() {
        Ok(())
    } else {
        Err(ExitStatusError {
            command: command.to_string(),
            status,
        })
    }
}

/// Runs external commands with a shared working directory, environment and output mode
#[derive(Debug, Clone)]
pub struct CommandRunner {
    working_dir: Option<PathBuf>,
    output_to_console: bool,
    envs: Vec<(String, String)>,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self {
            working_dir: None,
            output_to_console: true,
            envs: Vec::new(),
        }
    }
}

impl CommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Stream child output live (the default) or capture it.
    pub fn output_to_console(mut self, output_to_console: bool) -> Self {
        self.output_to_console = output_to_console;
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Execute a command with common setup and error handling.
    ///
    /// Returns `None` when output was streamed to the console and the captured output
    /// otherwise.
    pub fn run(&self, command: &mut Command) -> anyhow::Result<Option<CapturedOutput>> {
        let rendered = describe(command);

        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        for (key, value) in &self.envs {
            command.env(key, value);
        }

        debug!("Executing: {}", rendered);

        if self.output_to_console {
            let status = command
                .status()
                .with_context(|| format!("Failed to execute command '{}'", rendered))?;
            check_status(&rendered, status)?;
            return Ok(None);
        }

        let Output {
            status,
            stdout,
            stderr,
        } = command
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute command '{}'", rendered))?;

        let captured = CapturedOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        };
        if !status.success() && !captured.stderr.is_empty() {
            debug!("{}", captured.stderr.trim_end());
        }
        check_status(&rendered, status)?;
        Ok(Some(captured))
    }

    /// Execute a single shell command
    pub fn run_shell(&self, cmd: &str) -> anyhow::Result<Option<CapturedOutput>> {
        let mut command = Command::new("sh");
        command.arg("-c").arg(cmd);
        self.run(&mut command)
    }

    /// Execute a program with arguments
    pub fn run_program<I, S>(
        &self,
        program: &str,
        args: I,
    ) -> anyhow::Result<Option<CapturedOutput>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(program);
        command.args(args);
        self.run(&mut command)
    }

    /// Execute a script file, resolving relative paths against the working directory
    pub fn run_script(
        &self,
        script_path: impl AsRef<Path>,
    ) -> anyhow::Result<Option<CapturedOutput>> {
        let script_path = script_path.as_ref();
        let full_script_path = match &self.working_dir {
            Some(dir) if script_path.is_relative() => dir.join(script_path),
            _ => script_path.to_path_buf(),
        };

        if !full_script_path.exists() {
            anyhow::bail!("Script file '{}' not found", full_script_path.display());
        }

        let mut command = Command::new(&full_script_path);
        self.run(&mut command)
    }
}

fn check_status(command: &str, status: ExitStatus) -> anyhow::Result<()> {
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(exit_code) => Err(CommandError {
            command: command.to_string(),
            exit_code,
        }
        .into()),
        None => Err(ExitStatusError {
            command: command.to_string(),
            status,
        }
        .into()),
    }
}

fn describe(command: &Command) -> String {
    let mut parts = vec![command.get_program().to_string_lossy().into_owned()];
    parts.extend(command.get_args().map(|arg| arg.to_string_lossy().into_owned()));
    parts.join(" ")
}
