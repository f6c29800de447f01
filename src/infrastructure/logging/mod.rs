//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - stderr output for foreground CLI commands
//! - daily-rolling file output for the daemonized supervisor
//! - JSON or pretty formatting, `RUST_LOG` filtering

pub mod logger;

pub use logger::Logger;
