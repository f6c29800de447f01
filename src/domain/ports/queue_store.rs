use crate::domain::errors::StoreResult;
use crate::domain::models::{Task, TaskId, TaskParams};
use async_trait::async_trait;

/// Port for the shared queue store.
///
/// The store is the only resource shared between the supervisor and its
/// worker processes, so two operations carry hard contracts: `claim_next`
/// must be atomic (find-and-mark in one logical step, no double claims
/// across concurrent loops) and `delete` must be safe to call on an id
/// that is already gone.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Atomically claim the oldest unclaimed task.
    ///
    /// Returns `None` when the queue has no unclaimed tasks. A returned
    /// task has its claimed flag already set in the store; no other
    /// caller can claim it again.
    async fn claim_next(&self) -> StoreResult<Option<Task>>;

    /// Delete a task after its one execution attempt.
    ///
    /// Deleting an id that does not exist is not an error.
    async fn delete(&self, id: TaskId) -> StoreResult<()>;

    /// Total number of tasks, claimed and unclaimed.
    async fn count_all(&self) -> StoreResult<u64>;

    /// Enqueue a new task; returns the id the store assigned.
    async fn enqueue(&self, route: &str, params: TaskParams) -> StoreResult<TaskId>;

    /// Fetch a task by id.
    async fn get(&self, id: TaskId) -> StoreResult<Option<Task>>;

    /// Oldest tasks first, up to `limit`.
    async fn list(&self, limit: u32) -> StoreResult<Vec<Task>>;

    /// Clear the claimed flag on a task.
    ///
    /// Only used when a claim could not be turned into a worker (spawn
    /// failure); the task becomes claimable again. Releasing an unclaimed
    /// or absent id is not an error.
    async fn release(&self, id: TaskId) -> StoreResult<()>;
}
