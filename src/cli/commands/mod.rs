//! CLI command implementations.

pub mod exec_task;
pub mod queue;
pub mod run;
pub mod start;
pub mod status;
pub mod stop;
