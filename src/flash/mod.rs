//! Port selection and the esptool `write_flash` invocation.
//!
//! The flow is strictly sequential:
//!
//! ```text
//! PortDiscovery ──► print list ──► select one ──► build command ──► CommandRunner
//! ```
//!
//! Both ends are traits so the whole flow can be driven with a fixed port
//! list and a recording runner.

use std::io::{BufRead, Write};
use std::process::ExitCode;

use anyhow::Result;

use crate::serial::list::{print_ports, PortDiscovery};
use crate::serial::select::select_port;

pub mod command;
pub mod runner;

pub use command::{CommandInvocation, FlashTemplate};
pub use runner::{CommandRunner, SystemRunner};

/// Per-run switches that do not belong in the command template.
#[derive(Debug, Clone, Default)]
pub struct FlashOptions {
    /// Use this port instead of prompting.
    pub port: Option<String>,
    /// Print the command without running it.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashOutcome {
    /// The command was printed but not executed.
    DryRun(CommandInvocation),
    /// The child ran; `None` means it was terminated by a signal.
    Exited(Option<i32>),
}

impl FlashOutcome {
    pub fn success(&self) -> bool {
        matches!(self, FlashOutcome::DryRun(_) | FlashOutcome::Exited(Some(0)))
    }

    /// Status to exit with, mirroring the child's own. Codes that do not
    /// fit a byte and signal termination become 1.
    pub fn exit_status(&self) -> u8 {
        match self {
            FlashOutcome::DryRun(_) => 0,
            FlashOutcome::Exited(Some(code)) => u8::try_from(*code).unwrap_or(1),
            FlashOutcome::Exited(None) => 1,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

/// Lists ports, collects a selection and runs the flasher against it.
pub fn run<D, R, W, C>(
    discovery: D,
    input: &mut R,
    output: &mut W,
    runner: &mut C,
    template: &FlashTemplate,
    options: &FlashOptions,
) -> Result<FlashOutcome>
where
    D: PortDiscovery,
    R: BufRead,
    W: Write,
    C: CommandRunner + ?Sized,
{
    let port = match &options.port {
        Some(port) => {
            info!("Using port {} from command line", port);
            port.clone()
        }
        None => {
            let ports = discovery.ports()?;
            print_ports(output, &ports)?;
            select_port(input, output, &ports)?.device.clone()
        }
    };

    if !template.image().exists() {
        warn!(
            "Image file {} not found, esptool will report the failure",
            template.image().display()
        );
    }

    let cmd = template.command_for(&port);
    if options.dry_run {
        writeln!(output, "Would run: {}", cmd)?;
        output.flush()?;
        info!("Dry run, {} not started", cmd.program());
        return Ok(FlashOutcome::DryRun(cmd));
    }

    writeln!(output, "Running: {}", cmd)?;
    output.flush()?;

    let code = runner.run(&cmd)?;
    match code {
        Some(0) => debug!("{} exited cleanly", cmd.program()),
        Some(code) => error!("{} exited with status {}", cmd.program(), code),
        None => error!("{} was terminated by a signal", cmd.program()),
    }
    Ok(FlashOutcome::Exited(code))
}
