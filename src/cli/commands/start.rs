//! Start command - launch the queue daemon in the background.

use anyhow::{bail, Context, Result};
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::process::PidFile;

/// Spawn a detached daemon process and record its pid.
///
/// The daemon itself is this same binary re-invoked with the hidden `run`
/// subcommand. Configuration is loaded here first so a bad profile fails
/// loudly in the foreground instead of inside a detached process with no
/// terminal.
pub async fn execute(profile: &str, config_file: Option<&Path>, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load(profile, config_file)?;
    let pid_file = PidFile::new(config.pid_file(profile));

    if pid_file.is_running() {
        let pid = pid_file.read()?;
        bail!("daemon already running at PID: {pid} (profile '{profile}')");
    }

    let exe = std::env::current_exe().context("Failed to resolve current executable")?;
    let mut command = Command::new(exe);
    command.arg("--profile").arg(profile);
    if let Some(path) = config_file {
        command.arg("--config").arg(path);
    }
    command
        .arg("run")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        // New process group so terminal signals for this shell never reach
        // the daemon.
        .process_group(0);

    let child = command.spawn().context("Failed to spawn daemon process")?;
    let pid = i32::try_from(child.id()).context("Daemon pid out of range")?;

    // The daemon writes its own pid on startup too; writing here makes the
    // file visible as soon as `start` returns.
    pid_file.write(pid)?;

    if json_mode {
        let payload = serde_json::json!({
            "status": "started",
            "pid": pid,
            "profile": profile,
            "pid_file": pid_file.path(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("Daemon started at PID: {pid}");
    }

    Ok(())
}
