//! Shell command execution.
//!
//! Commands always run through the configured shell as a single command
//! line. The executable and each argument are quoted so that whitespace and
//! shell metacharacters stay literal argument content.
//!
//! # Example
//!
//! ```ignore
//! use shellgate_core::executor::run_command;
//! use shellgate_core::platform::Platform;
//!
//! let result = run_command(
//!     "echo",
//!     &["hello world".to_string()],
//!     "/bin/sh",
//!     Platform::Linux,
//!     Duration::from_secs(30),
//! )
//! .await?;
//! ```

use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::process::Command;

use crate::error::CommandError;
use crate::platform::Platform;

/// Captured output of a finished command.
///
/// The exit status is not surfaced; callers interpret `stderr` themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
}

/// Join the quoted executable and arguments into one shell command line.
pub fn build_command_line(command: &str, args: &[String]) -> Result<String, CommandError> {
    let mut parts = Vec::with_capacity(args.len() + 1);
    for part in std::iter::once(command).chain(args.iter().map(String::as_str)) {
        parts.push(
            shlex::try_quote(part)
                .map_err(|_| CommandError::InvalidCommandLine(format!("cannot quote {part:?}")))?
                .into_owned(),
        );
    }
    Ok(parts.join(" "))
}

/// Build the shell invocation: `<shell> /c <line>` on Windows,
/// `<shell> -c <line>` everywhere else.
///
/// Quoting is POSIX-style on every platform; `cmd.exe` does not treat single
/// quotes as quoting, so arguments with metacharacters are not literal there.
pub fn build_shell_command(
    shell_path: &str,
    platform: Platform,
    command: &str,
    args: &[String],
) -> Result<Command, CommandError> {
    let line = build_command_line(command, args)?;
    let flag = if platform.is_windows() { "/c" } else { "-c" };

    let mut cmd = Command::new(shell_path);
    cmd.arg(flag)
        .arg(line)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    Ok(cmd)
}

/// Run a command through the shell and capture its output.
///
/// When `timeout` elapses the child is killed and [`CommandError::Timeout`]
/// is returned. A non-zero exit status is not an error.
pub async fn run_command(
    command: &str,
    args: &[String],
    shell_path: &str,
    platform: Platform,
    timeout: Duration,
) -> Result<CommandResult, CommandError> {
    let mut cmd = build_shell_command(shell_path, platform, command, args)?;
    let child = cmd
        .spawn()
        .map_err(|e| CommandError::SpawnFailure(format!("{shell_path}: {e}")))?;

    // Dropping the wait future on timeout drops the child, and kill_on_drop
    // terminates it.
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return Err(CommandError::Io(e.to_string())),
        Err(_) => {
            log::warn!("Command timed out after {:?}: {}", timeout, command);
            return Err(CommandError::Timeout(timeout));
        }
    };

    log::debug!(
        "Command finished: {} (status {:?}, {} bytes stdout, {} bytes stderr)",
        command,
        output.status.code(),
        output.stdout.len(),
        output.stderr.len()
    );

    Ok(CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

// ============================================================================
// TESTS
// ============================================================================
