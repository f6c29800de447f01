//! Worker process body: execute one task, delete it, exit.
//!
//! This runs inside the spawned worker process, never in the supervisor.
//! Whatever the handler does, the task is deleted afterwards; a task gets
//! exactly one execution attempt and then disappears.

use crate::domain::models::TaskId;
use crate::domain::ports::QueueStore;
use crate::handlers::HandlerRegistry;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Executes a single claimed task to completion.
pub struct WorkerRunner<S>
where
    S: QueueStore,
{
    store: Arc<S>,
    registry: HandlerRegistry,
}

impl<S> WorkerRunner<S>
where
    S: QueueStore,
{
    pub fn new(store: Arc<S>, registry: HandlerRegistry) -> Self {
        Self { store, registry }
    }

    /// Run the task and return the worker's exit code.
    ///
    /// 0 when the handler succeeded, 1 when it failed or the task could
    /// not be deleted. Handler failures stay inside this process; the
    /// supervisor only ever sees the exit code.
    pub async fn run(&self, task_id: TaskId) -> i32 {
        let task = match self.store.get(task_id).await {
            Ok(Some(task)) => task,
            Ok(None) => {
                // Claimed but already gone: someone deleted it under us.
                warn!(%task_id, "Task vanished before execution");
                return 0;
            }
            Err(e) => {
                error!(%task_id, error = %e, "Failed to load task");
                return 1;
            }
        };

        info!(task_id = %task.id, route = %task.route, "Executing task");

        let mut code = match self.registry.execute(&task.route, &task.params).await {
            Ok(()) => {
                info!(task_id = %task.id, route = %task.route, "Task completed");
                0
            }
            Err(e) => {
                error!(
                    task_id = %task.id,
                    route = %task.route,
                    error = %e,
                    "Task failed"
                );
                1
            }
        };

        // Unconditional: success or failure, the attempt is spent.
        if let Err(e) = self.store.delete(task.id).await {
            error!(task_id = %task.id, error = %e, "Failed to delete task after execution");
            code = 1;
        }

        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteQueueStore};
    use crate::domain::errors::HandlerError;
    use crate::domain::models::TaskParams;
    use crate::domain::ports::TaskHandler;
    use async_trait::async_trait;

    struct FailingHandler;

    #[async_trait]
    impl TaskHandler for FailingHandler {
        async fn execute(&self, _route: &str, _params: &TaskParams) -> Result<(), HandlerError> {
            Err(HandlerError::ExecutionFailed("boom".to_string()))
        }
    }

    async fn store_with_task(route: &str) -> (Arc<SqliteQueueStore>, TaskId) {
        let pool = create_migrated_test_pool().await.expect("pool");
        let store = Arc::new(SqliteQueueStore::new(pool));
        let id = store
            .enqueue(route, vec![("cmd".to_string(), "true".to_string())])
            .await
            .expect("enqueue");
        // Workers only ever see claimed tasks.
        store.claim_next().await.expect("claim");
        (store, id)
    }

    #[tokio::test]
    async fn test_success_deletes_task() {
        let (store, id) = store_with_task("shell").await;
        let runner = WorkerRunner::new(store.clone(), HandlerRegistry::with_builtins());

        let code = runner.run(id).await;
        assert_eq!(code, 0);
        assert_eq!(store.get(id).await.expect("get"), None);
    }

    #[tokio::test]
    async fn test_failure_still_deletes_task() {
        let (store, id) = store_with_task("explode").await;
        let mut registry = HandlerRegistry::new();
        registry.register("explode", Arc::new(FailingHandler));
        let runner = WorkerRunner::new(store.clone(), registry);

        let code = runner.run(id).await;
        assert_eq!(code, 1);
        // At-most-once: the failed task is gone, not retried.
        assert_eq!(store.get(id).await.expect("get"), None);
    }

    #[tokio::test]
    async fn test_unknown_route_deletes_task() {
        let (store, id) = store_with_task("no-such-route").await;
        let runner = WorkerRunner::new(store.clone(), HandlerRegistry::with_builtins());

        let code = runner.run(id).await;
        assert_eq!(code, 1);
        assert_eq!(store.get(id).await.expect("get"), None);
    }

    #[tokio::test]
    async fn test_vanished_task_is_benign() {
        let (store, id) = store_with_task("shell").await;
        store.delete(id).await.expect("delete");
        let runner = WorkerRunner::new(store.clone(), HandlerRegistry::with_builtins());

        assert_eq!(runner.run(id).await, 0);
    }
}
