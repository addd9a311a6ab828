//! External program execution for the net-snmp transport.
//!
//! Programs are started directly with an argument vector, never through a
//! shell, so community strings and host names need no quoting.
//!
//! # Example
//!
//! ```ignore
//! use swraid_common::shell;
//!
//! let args: Vec<String> = ["-v2c", "-c", "public", "10.0.0.1", ".1.3"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let result = shell::exec("snmpbulkwalk", &args).await?;
//! if result.success() {
//!     println!("{}", result.stdout);
//! }
//! ```

use std::process::Stdio;
use tokio::process::Command;

use crate::error::{SwRaidError, SwRaidResult};

/// Default net-snmp bulk walk program, resolved through `PATH`.
pub const SNMPBULKWALK_CMD: &str = "snmpbulkwalk";

/// Result of a program execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// The exit code of the program (0 = success, -1 = killed by signal).
    pub exit_code: i32,
    /// The stdout output, untrimmed.
    pub stdout: String,
    /// The stderr output, trimmed.
    pub stderr: String,
}

impl ExecResult {
    /// Returns true if the program succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the combined output (stdout + stderr) for error messages.
    pub fn combined_output(&self) -> String {
        let stdout = self.stdout.trim();
        if self.stderr.is_empty() {
            stdout.to_string()
        } else if stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", stdout, self.stderr)
        }
    }
}

/// Executes a program asynchronously and captures its output.
///
/// Stdout is kept verbatim because walk output is line-structured and
/// multi-line string values must survive intact.
///
/// # Returns
///
/// * `Ok(ExecResult)` - The execution result, whatever the exit code
/// * `Err(SwRaidError::ProcessSpawn)` - If the program could not be started
pub async fn exec(program: &str, args: &[String]) -> SwRaidResult<ExecResult> {
    tracing::debug!(program = %program, args = ?args, "Executing program");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| SwRaidError::ProcessSpawn {
            program: program.to_string(),
            source: e,
        })?;

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    let result = ExecResult {
        exit_code,
        stdout,
        stderr,
    };

    if result.success() {
        tracing::trace!(program = %program, exit_code = exit_code, "Program succeeded");
    } else {
        tracing::warn!(
            program = %program,
            exit_code = exit_code,
            stderr = %result.stderr,
            "Program failed"
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exec_result_success() {
        let result = ExecResult {
            exit_code: 0,
            stdout: "output\n".to_string(),
            stderr: "".to_string(),
        };
        assert!(result.success());
        assert_eq!(result.combined_output(), "output");
    }

    #[test]
    fn test_exec_result_failure() {
        let result = ExecResult {
            exit_code: 1,
            stdout: "".to_string(),
            stderr: "Timeout: No Response from 127.0.0.1".to_string(),
        };
        assert!(!result.success());
        assert_eq!(
            result.combined_output(),
            "Timeout: No Response from 127.0.0.1"
        );
    }

    #[test]
    fn test_exec_result_combined() {
        let result = ExecResult {
            exit_code: 0,
            stdout: "stdout".to_string(),
            stderr: "stderr".to_string(),
        };
        assert_eq!(result.combined_output(), "stdout\nstderr");
    }

    #[tokio::test]
    async fn test_exec_echo_keeps_arguments_verbatim() {
        let result = exec("echo", &args(&["public$HOME", "\"quoted\""]))
            .await
            .unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, "public$HOME \"quoted\"\n");
    }

    #[tokio::test]
    async fn test_exec_failure() {
        let result = exec("sh", &args(&["-c", "exit 42"])).await.unwrap();
        assert!(!result.success());
        assert_eq!(result.exit_code, 42);
    }

    #[tokio::test]
    async fn test_exec_missing_program() {
        let result = exec("/nonexistent/snmpbulkwalk", &[]).await;
        match result {
            Err(SwRaidError::ProcessSpawn { program, .. }) => {
                assert_eq!(program, "/nonexistent/snmpbulkwalk");
            }
            other => panic!("Expected ProcessSpawn error, got {:?}", other),
        }
    }
}
