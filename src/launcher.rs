use std::ffi::{OsStr, OsString};
use std::process::{Command, Output};

use crate::errors::ProcessError;
use crate::types::describe;

/// Runs an external program to completion.
///
/// The runner only depends on this trait, so tests can substitute a fake
/// that fails on demand without spawning anything.
pub trait Launcher {
    fn run(&self, program: &OsStr, args: &[OsString]) -> Result<Output, ProcessError>;
}

/// Spawns the program with `std::process::Command`, capturing stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn run(&self, program: &OsStr, args: &[OsString]) -> Result<Output, ProcessError> {
        let command = describe(program, args);
        log::debug!("spawning {}", command);

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| ProcessError::Spawn {
                command: command.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(output)
        } else {
            Err(ProcessError::NonZeroExit {
                command,
                status: output.status,
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}
