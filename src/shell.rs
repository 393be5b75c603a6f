//! Execution of rendered commands through the system shell.

use crate::constants::SHELL;
use crate::error::{Error, Result};
use log::debug;
use std::process::{Command, Stdio};

fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new(SHELL);
    cmd.arg("-c").arg(command);
    cmd
}

/// Runs `command` with the tool's own standard streams.
///
/// # Errors
/// * `Error::IoError` if the shell cannot be spawned
/// * `Error::CommandError` if the command exits with a non-zero status
pub fn run_command(command: &str) -> Result<()> {
    debug!("Executing command: {command}");
    let status = shell_command(command)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        return Err(Error::CommandError { command: command.to_string(), status });
    }
    Ok(())
}

/// Runs `command` and returns what it wrote to standard output.
pub fn command_output(command: &str) -> Result<String> {
    debug!("Executing command for output: {command}");
    let output = shell_command(command)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()?;

    if !output.status.success() {
        return Err(Error::CommandError { command: command.to_string(), status: output.status });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
