//! Infrastructure layer module
//!
//! External integrations behind the domain ports:
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - Process management (pid file, signals)

pub mod config;
pub mod logging;
pub mod process;
