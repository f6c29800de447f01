//! Run command - the supervisor loop, foreground.
//!
//! `start` spawns this same subcommand detached; running it directly keeps
//! the daemon in the foreground, which is what you want under a process
//! supervisor or in development.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

use crate::adapters::sqlite::{initialize_database, SqliteQueueStore};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::Logger;
use crate::infrastructure::process::PidFile;
use crate::services::{signals, ProcessSpawner, Supervisor};

pub async fn execute(profile: &str, config_file: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(profile, config_file)?;
    // Keep the guard alive for the whole run so buffered log lines flush.
    let _logger = Logger::init_daemon(&config.logging)?;

    // Stdout and stderr are detached when daemonized; anything fatal after
    // this point is only visible in the log file.
    if let Err(err) = supervise(profile, config_file, config).await {
        error!(error = %err, "Daemon exited with error");
        return Err(err);
    }
    Ok(())
}

async fn supervise(profile: &str, config_file: Option<&Path>, config: Config) -> Result<()> {
    info!(
        profile = %profile,
        max_concurrency = config.max_concurrency,
        database = %config.database.path,
        "Starting queue daemon"
    );

    let pool = initialize_database(&config.database.path, config.database.max_connections)
        .await
        .context("Failed to initialize database")?;
    let store = Arc::new(SqliteQueueStore::new(pool));
    let spawner = Arc::new(ProcessSpawner::new(
        profile,
        config_file.map(Path::to_path_buf),
    ));
    let pid_file = PidFile::new(config.pid_file(profile));

    let supervisor = Supervisor::new(store, spawner, config, pid_file);
    signals::spawn_terminate_listener(supervisor.handle());

    let summary = supervisor.run().await?;
    info!(
        residual_workers = summary.residual_workers,
        "Daemon shut down"
    );
    Ok(())
}
