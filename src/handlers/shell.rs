//! Builtin shell-command handler.

use crate::domain::errors::HandlerError;
use crate::domain::models::{param, params_except, TaskParams};
use crate::domain::ports::TaskHandler;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

/// Runs the `cmd` parameter through `/bin/sh -c`.
///
/// Every other parameter is passed as an environment variable, so a task
/// `cmd=backup.sh, TARGET=/srv/data` behaves like
/// `TARGET=/srv/data backup.sh`. A non-zero exit status is a handler
/// error; the worker still deletes the task.
pub struct ShellHandler;

#[async_trait]
impl TaskHandler for ShellHandler {
    async fn execute(&self, _route: &str, params: &TaskParams) -> Result<(), HandlerError> {
        let cmd = param(params, "cmd").ok_or(HandlerError::MissingParam("cmd"))?;

        debug!(cmd, "Running shell command");

        let mut command = Command::new("/bin/sh");
        command.arg("-c").arg(cmd);
        for (key, value) in params_except(params, "cmd") {
            command.env(key, value);
        }

        let status = command.status().await?;

        if status.success() {
            info!(cmd, "Shell command finished");
            Ok(())
        } else {
            Err(HandlerError::CommandFailed {
                command: cmd.to_string(),
                status: status.code().unwrap_or(-1),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> TaskParams {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_successful_command() {
        let handler = ShellHandler;
        let result = handler.execute("shell", &params(&[("cmd", "true")])).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_failing_command_reports_status() {
        let handler = ShellHandler;
        let err = handler
            .execute("shell", &params(&[("cmd", "exit 3")]))
            .await
            .expect_err("should fail");
        match err {
            HandlerError::CommandFailed { status, .. } => assert_eq!(status, 3),
            other => panic!("Expected CommandFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_cmd_param() {
        let handler = ShellHandler;
        let err = handler
            .execute("shell", &params(&[("other", "x")]))
            .await
            .expect_err("should fail");
        assert!(matches!(err, HandlerError::MissingParam("cmd")));
    }

    #[tokio::test]
    async fn test_params_become_environment() {
        let handler = ShellHandler;
        let result = handler
            .execute(
                "shell",
                &params(&[("cmd", r#"test "$GREETING" = hello"#), ("GREETING", "hello")]),
            )
            .await;
        assert!(result.is_ok());
    }
}
