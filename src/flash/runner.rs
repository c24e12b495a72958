use std::process::Command;

use anyhow::{Context, Result};

use super::command::CommandInvocation;

/// Executes an assembled command and reports how it exited.
pub trait CommandRunner {
    /// Returns the child's exit code, or `None` if it was terminated by a signal.
    fn run(&mut self, cmd: &CommandInvocation) -> Result<Option<i32>>;
}

/// Spawns the command as a child process with inherited stdio and waits for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, cmd: &CommandInvocation) -> Result<Option<i32>> {
        let status = Command::new(cmd.program())
            .args(cmd.args())
            .status()
            .with_context(|| format!("failed to start {}", cmd.program()))?;
        Ok(status.code())
    }
}
