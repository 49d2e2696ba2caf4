//! External command execution with command echoing.
//!
//! Every command is logged before it runs so build logs show exactly what
//! happened. Visible at the default `info` level; `RUST_LOG=bumpr::cmd=debug`
//! adds the working directory.

use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Render a command as a shell-like line for logs and error messages.
#[must_use]
pub fn describe(cmd: &Command) -> String {
    let mut line = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        let arg = arg.to_string_lossy();
        line.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            line.push('\'');
            line.push_str(&arg);
            line.push('\'');
        } else {
            line.push_str(&arg);
        }
    }
    line
}

/// Log a command just before execution.
pub fn log_cmd(cmd: &Command) {
    let cwd = cmd
        .get_current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    info!(target: "bumpr::cmd", "+ {}", describe(cmd));
    debug!(target: "bumpr::cmd", %cwd, "exec");
}

/// Run a command with inherited stdio and return its exit status.
///
/// A non-zero exit is *not* an error here; callers use this for steps whose
/// failure is tolerated.
///
/// # Errors
/// Returns [`Error::Spawn`] if the program cannot be started.
pub fn status(cmd: &mut Command) -> Result<ExitStatus> {
    log_cmd(cmd);
    cmd.status().map_err(|source| Error::Spawn {
        program: cmd.get_program().to_string_lossy().into_owned(),
        source,
    })
}

/// Run a command with inherited stdio, failing on a non-zero exit.
///
/// # Errors
/// Returns [`Error::CommandFailed`] carrying the exit code, or
/// [`Error::Spawn`] if the program cannot be started.
pub fn run(cmd: &mut Command) -> Result<()> {
    let status = status(cmd)?;
    check(cmd, status)
}

/// Run a command and capture its stdout, failing on a non-zero exit.
///
/// Stderr is forwarded to the log on failure.
///
/// # Errors
/// Returns [`Error::CommandFailed`] or [`Error::Spawn`].
pub fn output(cmd: &mut Command) -> Result<String> {
    log_cmd(cmd);
    let output = cmd
        .stdin(Stdio::null())
        .output()
        .map_err(|source| Error::Spawn {
            program: cmd.get_program().to_string_lossy().into_owned(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            warn!(target: "bumpr::cmd", "{}", stderr.trim_end());
        }
    }
    check(cmd, output.status)?;

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn check(cmd: &Command, status: ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(Error::CommandFailed {
            command: describe(cmd),
            code: status.code(),
        })
    }
}
