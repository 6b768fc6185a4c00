//! External command execution.
//!
//! Everything that shells out (`which`, `rsync`, `tar`) goes through
//! [`CommandRunner`], so installer and cloner logic can be exercised with a
//! fake runner in tests.

use anyhow::{Context, Result};
use std::process::{Command, Output, Stdio};

/// Exit status and captured standard output of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `-1` when the process was killed by a signal
    pub code: i32,
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        }
    }
}

pub trait CommandRunner {
    /// Run `program` with `args` to completion.
    ///
    /// Only a failure to spawn is an `Err`; a non-zero exit is reported
    /// through [`CommandOutput::code`].
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Runs real processes. Stdout is captured, stderr goes straight to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .with_context(|| format!("Failed to execute '{}'", program))?;
        Ok(CommandOutput::from(output))
    }
}

/// Render a command line for display (debug output only, never executed).
pub fn display_command(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if arg.contains(' ') {
            line.push_str(&format!("'{}'", arg));
        } else {
            line.push_str(arg);
        }
    }
    line
}
