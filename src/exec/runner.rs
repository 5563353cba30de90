use log::*;
use std::process::Command;

#[cfg(test)]
use mockall::automock;

use crate::{
    LocalTestsError, Result, error::GENERIC_FAILURE_CODE,
    exec::stopwatch::Stopwatch,
};

/// Runs shell command lines one at a time.
#[cfg_attr(test, automock)]
pub trait CommandRunner {
    /// Run `command` to completion. A non-zero exit is returned as
    /// [`LocalTestsError::CommandFailed`] carrying the command's exit code.
    fn run(&self, command: &str) -> Result<()>;
}

fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

/// Runs commands through the system shell with inherited stdio, timing each
/// one.
pub struct ShellRunner<'a> {
    label: String,
    dry_run: bool,
    stopwatch: &'a dyn Stopwatch,
}

impl<'a> ShellRunner<'a> {
    pub fn new(
        label: impl Into<String>,
        dry_run: bool,
        stopwatch: &'a dyn Stopwatch,
    ) -> Self {
        Self {
            label: label.into(),
            dry_run,
            stopwatch,
        }
    }

    fn exec(&self, command: &str) -> Result<()> {
        if self.dry_run {
            warn!("dry_run: would execute: {command}");
            return Ok(());
        }

        debug!("executing: {command}");
        let status = shell_command(command).status()?;

        if status.success() {
            return Ok(());
        }

        let code = status.code().unwrap_or(GENERIC_FAILURE_CODE);
        error!("{}: command failed with exit code {code}: {command}", self.label);

        Err(LocalTestsError::command_failed(command, code))
    }
}

impl CommandRunner for ShellRunner<'_> {
    fn run(&self, command: &str) -> Result<()> {
        let started = self.stopwatch.start(command, &self.label);
        let result = self.exec(command);
        if result.is_ok() {
            self.stopwatch.stop(command, &self.label, started);
        }
        result
    }
}
