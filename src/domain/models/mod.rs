pub mod config;
pub mod task;

pub use config::{Config, DatabaseConfig, DrainConfig, LoggingConfig};
pub use task::{param, params_except, Task, TaskId, TaskParams};
