//! Status command - daemon liveness plus queue depth.

use anyhow::Result;
use std::path::Path;

use crate::adapters::sqlite::{initialize_database, SqliteQueueStore};
use crate::domain::ports::QueueStore;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::process::PidFile;

/// Report whether the daemon is alive and how many tasks are queued.
///
/// Liveness is a signal-0 probe against the pid file, so a stale file from
/// a crashed daemon reads as not running.
pub async fn execute(profile: &str, config_file: Option<&Path>, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load(profile, config_file)?;
    let pid_file = PidFile::new(config.pid_file(profile));

    let running = pid_file.is_running();
    let pid = pid_file.read().ok();

    let pool =
        initialize_database(&config.database.path, config.database.max_connections).await?;
    let store = SqliteQueueStore::new(pool);
    let tasks = store.count_all().await?;

    if json_mode {
        let payload = serde_json::json!({
            "running": running,
            "pid": if running { pid } else { None },
            "profile": profile,
            "tasks": tasks,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        match pid {
            Some(pid) if running => println!("Daemon is running at PID: {pid}"),
            _ => println!("Daemon is NOT running"),
        }
        println!("{tasks} tasks in queue");
    }

    Ok(())
}
