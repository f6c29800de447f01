//! Domain layer for the drover job-queue daemon
//!
//! Core models, error taxonomy, and the port traits the adapters and
//! services implement against.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{HandlerError, PidFileError, StoreError, SupervisorError};
