//! Fail-fast shell-outs to system utilities.
//!
//! Every mutating action the installer performs is a direct invocation of
//! an external binary. Execution is strictly linear and fail-fast: a
//! non-zero exit aborts the entire run with a `Failed during:` message.
//! There are no retries and no rollback.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Result, StrapError};

/// Join command arguments into a display line, escaping spaces.
///
/// The first argument is taken verbatim; spaces in subsequent arguments
/// are backslash-escaped. Used for `ohai` echoes and failure messages,
/// not for re-parsing.
pub fn shell_join<S: AsRef<str>>(args: &[S]) -> String {
    let mut parts = args.iter().map(|arg| arg.as_ref());
    let Some(first) = parts.next() else {
        return String::new();
    };
    let mut joined = first.to_string();
    for arg in parts {
        joined.push(' ');
        joined.push_str(&arg.replace(' ', "\\ "));
    }
    joined
}

/// Captured output of a query command.
#[derive(Debug, Clone)]
pub struct Captured {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Run a query command with captured output.
///
/// Spawn failures are errors; a non-zero exit is reported in the result
/// so callers can decide (e.g. `dsmemberutil` output inspection).
pub fn capture(program: &str, args: &[&str]) -> Result<Captured> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|_| command_failed(program, args, None))?;

    Ok(Captured {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        success: output.status.success(),
    })
}

/// Run a command with inherited stdio, failing fast on non-zero exit.
pub fn run(program: &str, args: &[&str]) -> Result<()> {
    run_in(None, program, args)
}

/// Run a command in a specific working directory, failing fast.
pub fn run_in(dir: Option<&Path>, program: &str, args: &[&str]) -> Result<()> {
    tracing::debug!("running: {} {}", program, args.join(" "));

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    let status = cmd
        .status()
        .map_err(|_| command_failed(program, args, None))?;

    if status.success() {
        Ok(())
    } else {
        Err(command_failed(program, args, status.code()))
    }
}

fn command_failed(program: &str, args: &[&str], code: Option<i32>) -> StrapError {
    let mut line = Vec::with_capacity(args.len() + 1);
    line.push(program);
    line.extend_from_slice(args);
    StrapError::CommandFailed {
        command: shell_join(&line),
        code,
    }
}
