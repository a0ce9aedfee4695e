/*!
 * Command Execution
 * Runs shell command lines and hands their stdout back as text
 */

use std::process::Command;

use tracing::{debug, warn};

use crate::error::{BluetoothError, Result};

/// Runs a command line and returns what it printed on stdout.
pub trait CommandRunner: Send + Sync {
    fn run(&self, command_line: &str) -> Result<String>;
}

/// Runs command lines through `sh -c`.
pub struct ShellRunner {
    fail_on_nonzero_exit: bool,
}

impl ShellRunner {
    pub fn new(fail_on_nonzero_exit: bool) -> Self {
        Self { fail_on_nonzero_exit }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(false)
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command_line: &str) -> Result<String> {
        debug!("Running: {}", command_line);

        let output = Command::new("sh").args(["-c", command_line]).output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if self.fail_on_nonzero_exit {
                return Err(BluetoothError::CommandFailed {
                    command: command_line.to_string(),
                    code: output.status.code(),
                    stderr,
                });
            }
            warn!(
                "`{}` exited with {:?}: {}",
                command_line,
                output.status.code(),
                stderr
            );
        }

        Ok(stdout)
    }
}

/// Quote a single argument for `sh`.
pub fn shell_quote(arg: &str) -> String {
    if !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '-' | '_' | '.' | '/'))
    {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}
