use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use async_trait::async_trait;
use nvmex_common::error::{NvmexError, Result};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Runs the nvme management tool and returns its standard output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, args: &[&str]) -> Result<Vec<u8>>;
}

/// `nvme-cli` invoked as a child process, bounded by a per-call timeout.
#[derive(Debug, Clone)]
pub struct NvmeCli {
    binary: PathBuf,
    timeout: Duration,
}

impl NvmeCli {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command_line(&self, args: &[&str]) -> String {
        let mut line = self.binary.display().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

#[async_trait]
impl CommandRunner for NvmeCli {
    async fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let command_line = self.command_line(args);
        debug!(command = %command_line, "running nvme command");

        let mut command = Command::new(&self.binary);
        command.args(args).stdin(Stdio::null()).kill_on_drop(true);

        let output = match timeout(self.timeout, command.output()).await {
            Ok(result) => result.map_err(|err| NvmexError::Execution {
                command: command_line.clone(),
                reason: err.to_string(),
            })?,
            Err(_) => {
                return Err(NvmexError::Timeout {
                    command: command_line,
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let reason = if stderr.is_empty() {
                output.status.to_string()
            } else {
                format!("{}: {stderr}", output.status)
            };
            return Err(NvmexError::Execution {
                command: command_line,
                reason,
            });
        }

        Ok(output.stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use nvmex_common::error::NvmexError;

    use super::{CommandRunner, NvmeCli};

    #[tokio::test]
    async fn captures_stdout_of_successful_command() {
        let runner = NvmeCli::new("sh", Duration::from_secs(5));

        let stdout = runner.run(&["-c", "printf '{\"Devices\":[]}'"]).await.unwrap();

        assert_eq!(stdout, br#"{"Devices":[]}"#);
    }

    #[tokio::test]
    async fn nonzero_exit_is_an_execution_error() {
        let runner = NvmeCli::new("sh", Duration::from_secs(5));

        let err = runner
            .run(&["-c", "echo 'permission denied' >&2; exit 3"])
            .await
            .unwrap_err();

        match err {
            NvmexError::Execution { command, reason } => {
                assert!(command.starts_with("sh -c"));
                assert!(reason.contains("permission denied"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_binary_is_an_execution_error() {
        let runner = NvmeCli::new("/nonexistent/nvme", Duration::from_secs(5));

        let err = runner.run(&["list", "-o", "json"]).await.unwrap_err();

        assert!(err.is_execution());
    }

    #[tokio::test]
    async fn slow_command_times_out() {
        let runner = NvmeCli::new("sleep", Duration::from_millis(100));

        let err = runner.run(&["5"]).await.unwrap_err();

        assert!(matches!(err, NvmexError::Timeout { .. }));
        assert!(err.is_execution());
    }
}
