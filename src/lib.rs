//! Drover - single-node job-queue daemon
//!
//! Drover is a background task runner: producers append tasks to a shared
//! SQLite-backed queue, and a supervisor daemon claims them one at a time
//! and executes each inside an isolated worker process, up to a configured
//! concurrency ceiling. Tasks run at most once; a task that fails is
//! deleted, not retried.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Task model, configuration, and the
//!   `QueueStore` / `TaskHandler` ports
//! - **Adapter Layer** (`adapters`): SQLite implementation of the queue store
//! - **Service Layer** (`services`): Supervisor loop, worker pool, process
//!   spawning, and the in-worker task runner
//! - **Handler Layer** (`handlers`): Built-in task handlers and the registry
//! - **Infrastructure Layer** (`infrastructure`): Config loading, logging,
//!   pid files
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use drover::adapters::sqlite::{initialize_database, SqliteQueueStore};
//! use drover::domain::ports::QueueStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = initialize_database(".drover/queue.db", 5).await?;
//!     let store = SqliteQueueStore::new(pool);
//!     store.enqueue("shell", vec![("cmd".into(), "true".into())]).await?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod handlers;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, DatabaseConfig, DrainConfig, LoggingConfig, Task, TaskId, TaskParams,
};
pub use domain::ports::{QueueStore, TaskHandler};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Supervisor, SupervisorEvent, WorkerPool, WorkerRunner};
