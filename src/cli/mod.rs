//! CLI layer: argument types, command entry points, and error reporting.

pub mod commands;
pub mod types;

pub use types::{Cli, Commands, QueueCommands};

/// Print a top-level command failure to stderr.
///
/// The alternate format walks the whole `anyhow` context chain, so the
/// user sees both what failed and why.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) {
    if json_mode {
        let payload = serde_json::json!({ "error": format!("{err:#}") });
        eprintln!("{payload}");
    } else {
        eprintln!("Error: {err:#}");
    }
}
