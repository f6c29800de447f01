//! Stop command - signal a running daemon to drain and exit.

use anyhow::Result;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::path::Path;

use crate::domain::errors::PidFileError;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::process::PidFile;

/// Send SIGTERM to the daemon recorded in the pid file.
///
/// The daemon removes the pid file itself once its drain completes, so a
/// successful delivery leaves the file in place. A stale pid file (process
/// already gone) or a corrupt one is cleaned up here; a corrupt pid never
/// reaches `kill()`.
pub async fn execute(profile: &str, config_file: Option<&Path>, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load(profile, config_file)?;
    let pid_file = PidFile::new(config.pid_file(profile));

    let pid = match pid_file.read() {
        Ok(pid) => pid,
        Err(PidFileError::NotFound(_)) => {
            if json_mode {
                let payload = serde_json::json!({ "status": "not_running" });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Daemon is NOT running");
            }
            return Ok(());
        }
        Err(PidFileError::Malformed { content, .. }) => {
            if let Err(remove_err) = pid_file.remove() {
                eprintln!("Warning: could not remove corrupt pid file: {remove_err}");
            }
            if json_mode {
                let payload = serde_json::json!({ "status": "corrupt", "content": content });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Pid file was corrupt ({content:?}), removed it");
            }
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    match kill(Pid::from_raw(pid), Signal::SIGTERM) {
        Ok(()) => {
            if json_mode {
                let payload = serde_json::json!({ "status": "stopping", "pid": pid });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Stop signal sent to daemon at PID: {pid}");
            }
        }
        Err(errno) => {
            // Process is gone but the pid file survived (hard kill, crash).
            if let Err(remove_err) = pid_file.remove() {
                eprintln!("Warning: could not remove stale pid file: {remove_err}");
            }
            if json_mode {
                let payload = serde_json::json!({
                    "status": "stale",
                    "pid": pid,
                    "error": errno.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Could not signal PID: {pid} ({errno}), removed stale pid file");
            }
        }
    }

    Ok(())
}
