//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces the rest of the system is written against:
//! - `QueueStore`: the shared task collection (atomic claim, delete, count)
//! - `TaskHandler`: one task's business logic, run inside a worker process
//!
//! Adapters implement these; the supervisor and workers consume them.

pub mod queue_store;
pub mod task_handler;

pub use queue_store::QueueStore;
pub use task_handler::TaskHandler;
