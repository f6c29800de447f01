//! Domain errors for the drover daemon.
//!
//! The variants mirror the failure taxonomy the daemon distinguishes:
//! store failures, handler failures (task-local), supervisor failures
//! (fatal to the process), and pid file failures (reported to the
//! operator, never a crash).

use crate::domain::models::TaskId;
use thiserror::Error;

/// Errors from the queue store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result alias for queue store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Errors from task handler execution.
///
/// Always task-local: a worker logs the error, deletes the task, and
/// exits; the supervisor never sees it.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("No handler registered for route: {0}")]
    UnknownRoute(String),

    #[error("Missing required parameter: {0}")]
    MissingParam(&'static str),

    #[error("Command exited with status {status}: {command}")]
    CommandFailed { command: String, status: i32 },

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<std::io::Error> for HandlerError {
    fn from(err: std::io::Error) -> Self {
        Self::ExecutionFailed(err.to_string())
    }
}

/// Errors that terminate the supervisor.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("Failed to spawn worker for task {task_id}: {source}")]
    SpawnFailed {
        task_id: TaskId,
        #[source]
        source: std::io::Error,
    },

    #[error("Queue store failure: {0}")]
    Store(#[from] StoreError),

    #[error("Pid file error: {0}")]
    PidFile(#[from] PidFileError),
}

/// Errors around the process identity file.
#[derive(Debug, Error)]
pub enum PidFileError {
    #[error("Pid file not found at {0}")]
    NotFound(String),

    #[error("Pid file {path} holds invalid content: {content:?}")]
    Malformed { path: String, content: String },

    #[error("I/O error on pid file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
