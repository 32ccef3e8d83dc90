//! External command runner.
//!
//! Every invocation is logged before it runs. A non-zero exit status is an
//! error; callers decide whether it is fatal.

use log::info;
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

/// Errors from running external commands.
#[derive(Error, Debug)]
pub enum ShellError {
    /// The program could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The program exited unsuccessfully.
    #[error("'{command}' failed: {status}")]
    Failed {
        /// Full command line.
        command: String,
        /// Exit status.
        status: ExitStatus,
    },
    /// Captured stdout was expected to be text.
    #[error("output of '{command}' is not valid UTF-8")]
    InvalidOutput {
        /// Full command line.
        command: String,
    },
}

fn arg_strs<S: AsRef<str>>(args: &[S]) -> impl Iterator<Item = &str> {
    args.iter().map(|arg| arg.as_ref())
}

fn command_line<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    std::iter::once(program)
        .chain(arg_strs(args))
        .collect::<Vec<_>>()
        .join(" ")
}

fn command<S: AsRef<str>>(program: &str, args: &[S]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(arg_strs(args));
    cmd
}

fn check(status: ExitStatus, line: String) -> Result<(), ShellError> {
    if status.success() {
        Ok(())
    } else {
        Err(ShellError::Failed {
            command: line,
            status,
        })
    }
}

/// Runs `program` with stdout and stderr passed through.
pub fn run<S: AsRef<str>>(program: &str, args: &[S]) -> Result<(), ShellError> {
    let line = command_line(program, args);
    info!("{line}");
    let status = command(program, args)
        .status()
        .map_err(|source| ShellError::Spawn {
            program: program.to_string(),
            source,
        })?;
    check(status, line)
}

/// Runs `program` and returns its raw stdout. Stderr is passed through.
pub fn output_bytes<S: AsRef<str>>(program: &str, args: &[S]) -> Result<Vec<u8>, ShellError> {
    let line = command_line(program, args);
    info!("{line}");
    let output = command(program, args)
        .stderr(Stdio::inherit())
        .output()
        .map_err(|source| ShellError::Spawn {
            program: program.to_string(),
            source,
        })?;
    check(output.status, line)?;
    Ok(output.stdout)
}

/// Runs `program` and returns its stdout as trimmed text.
pub fn output<S: AsRef<str>>(program: &str, args: &[S]) -> Result<String, ShellError> {
    let stdout = output_bytes(program, args)?;
    String::from_utf8(stdout)
        .map(|text| text.trim().to_string())
        .map_err(|_| ShellError::InvalidOutput {
            command: command_line(program, args),
        })
}

/// Runs a command line through `sh -c`.
pub fn sh(script: &str) -> Result<(), ShellError> {
    run("sh", &["-c", script])
}

/// Runs a command line through `sh -c` and returns trimmed stdout.
pub fn sh_output(script: &str) -> Result<String, ShellError> {
    output("sh", &["-c", script])
}
