//! Download of the build output shared between CI jobs.
use log::*;

#[cfg(test)]
use mockall::automock;

use crate::{Result, config::BUILD_NUMBER_PLACEHOLDER, exec::CommandRunner};

/// Fetches shared build artifacts into the local workspace.
#[cfg_attr(test, automock)]
pub trait BuildOutput {
    fn download(&self, label: &str) -> Result<()>;
}

/// Downloads build output by running a list of shell commands.
pub struct CommandBuildOutput<'a> {
    commands: Vec<String>,
    build_number: Option<String>,
    runner: &'a dyn CommandRunner,
}

impl<'a> CommandBuildOutput<'a> {
    pub fn new(
        commands: Vec<String>,
        build_number: Option<String>,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            commands,
            build_number,
            runner,
        }
    }

    fn expand(&self, command: &str) -> String {
        match &self.build_number {
            Some(number) => command.replace(BUILD_NUMBER_PLACEHOLDER, number),
            None => command.to_string(),
        }
    }
}

impl BuildOutput for CommandBuildOutput<'_> {
    fn download(&self, label: &str) -> Result<()> {
        if self.build_number.is_none()
            && self
                .commands
                .iter()
                .any(|c| c.contains(BUILD_NUMBER_PLACEHOLDER))
        {
            warn!(
                "{label}: no CI build number found: {BUILD_NUMBER_PLACEHOLDER} will be left to the shell"
            );
        }

        info!("{label}: Downloading build output...");

        for command in &self.commands {
            self.runner.run(&self.expand(command))?;
        }

        info!("{label}: Extracted build output");

        Ok(())
    }
}
