use crate::domain::errors::HandlerError;
use crate::domain::models::TaskParams;
use async_trait::async_trait;

/// Port for task business logic.
///
/// Implementations run inside the worker process, never in the
/// supervisor. Any error is task-local: the worker logs it and the task
/// is deleted regardless.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    /// Execute one task.
    async fn execute(&self, route: &str, params: &TaskParams) -> Result<(), HandlerError>;
}
