pub mod signals;
pub mod spawner;
pub mod supervisor;
pub mod worker_pool;
pub mod worker_runner;

pub use spawner::{ProcessSpawner, WorkerSpawner};
pub use supervisor::{RunSummary, Supervisor, SupervisorEvent, SupervisorHandle, WorkerOutcome};
pub use worker_pool::{WorkerPool, WorkerRecord};
pub use worker_runner::WorkerRunner;
