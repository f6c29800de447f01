//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "drover")]
#[command(about = "Drover - single-node job-queue daemon", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration profile to use
    #[arg(short, long, global = true, default_value = "default")]
    pub profile: String,

    /// Path to the config file (defaults to .drover/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the daemon in the background
    Start,

    /// Stop a running daemon (SIGTERM, then it drains its workers)
    Stop,

    /// Show daemon liveness and queue depth
    Status,

    /// Queue management commands
    #[command(subcommand)]
    Queue(QueueCommands),

    /// Run the supervisor in the foreground (what `start` backgrounds)
    #[command(hide = true)]
    Run,

    /// Execute one claimed task as a worker process
    #[command(name = "exec-task", hide = true)]
    ExecTask {
        /// Task id to execute
        #[arg(long)]
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum QueueCommands {
    /// Add a task to the queue
    Add {
        /// Handler route name
        #[arg(short, long, default_value = "shell")]
        route: String,

        /// Parameters as key=value pairs, order preserved
        #[arg(value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// List queued tasks, oldest first
    List {
        /// Maximum number of tasks to display
        #[arg(short, long, default_value = "50")]
        limit: u32,
    },

    /// Count tasks in the queue (claimed and unclaimed)
    Count,
}

/// Parse a `key=value` argument.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid key=value pair: '{s}'"))
}
