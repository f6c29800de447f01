//! Exec-task command - run one claimed task inside a worker process.
//!
//! The supervisor spawns this subcommand once per claimed task. The worker
//! loads the same profile, executes the task through the handler registry,
//! deletes the row, and exits with the task's outcome as its exit code.

use anyhow::Result;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::sqlite::{initialize_database, SqliteQueueStore};
use crate::domain::models::TaskId;
use crate::handlers::HandlerRegistry;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::Logger;
use crate::services::WorkerRunner;

pub async fn execute(profile: &str, config_file: Option<&Path>, id: i64) -> Result<ExitCode> {
    let config = ConfigLoader::load(profile, config_file)?;
    // Workers share the daemon's log directory; stdio is null.
    let _logger = Logger::init_daemon(&config.logging)?;

    let pool =
        initialize_database(&config.database.path, config.database.max_connections).await?;
    let store = Arc::new(SqliteQueueStore::new(pool));

    let runner = WorkerRunner::new(store, HandlerRegistry::with_builtins());
    let code = runner.run(TaskId(id)).await;

    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
