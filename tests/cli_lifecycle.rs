//! Control-surface tests for `start`, `stop`, and `status`.
//!
//! Spawning a real detached daemon needs an installed binary, so these
//! stick to the paths that work against the pid file and config alone:
//! the liveness probe, the refusal to double-start, and cleanup of stale
//! or corrupt pid files. The daemon side of the lifecycle is covered by
//! the supervisor tests.

use drover::cli::commands::{start, status, stop};
use std::path::PathBuf;
use tempfile::TempDir;

/// Far above any real pid, so probes and SIGTERM always land in ESRCH.
const DEAD_PID: i32 = 2_000_000_000;

struct Profile {
    _dir: TempDir,
    config_path: PathBuf,
    pid_path: PathBuf,
}

impl Profile {
    fn config(&self) -> Option<&std::path::Path> {
        Some(self.config_path.as_path())
    }

    fn write_pid(&self, content: &str) {
        std::fs::write(&self.pid_path, format!("{content}\n")).expect("write pid file");
    }
}

fn write_profile() -> Profile {
    let dir = TempDir::new().expect("tempdir");
    let pid_path = dir.path().join("drover.pid");
    let config_path = dir.path().join("config.yaml");

    let yaml = format!(
        "default:\n  max_concurrency: 2\n  pid_file_path: \"{pid}\"\n  database:\n    path: \"{db}\"\n  logging:\n    dir: \"{logs}\"\n",
        pid = pid_path.display(),
        db = dir.path().join("queue.db").display(),
        logs = dir.path().join("logs").display(),
    );
    std::fs::write(&config_path, yaml).expect("write config");

    Profile {
        _dir: dir,
        config_path,
        pid_path,
    }
}

#[tokio::test]
async fn test_status_succeeds_with_no_daemon_and_empty_queue() {
    let profile = write_profile();

    status::execute("default", profile.config(), false)
        .await
        .expect("status");

    assert!(!profile.pid_path.exists());
}

#[tokio::test]
async fn test_status_leaves_a_live_daemons_pid_file_alone() {
    let profile = write_profile();
    // Our own pid stands in for a live daemon.
    profile.write_pid(&std::process::id().to_string());

    status::execute("default", profile.config(), true)
        .await
        .expect("status");

    assert!(profile.pid_path.exists());
}

#[tokio::test]
async fn test_start_refuses_while_pid_file_names_a_live_process() {
    let profile = write_profile();
    profile.write_pid(&std::process::id().to_string());

    let err = start::execute("default", profile.config(), false)
        .await
        .expect_err("start should refuse to double-start");

    assert!(
        err.to_string().contains("already running"),
        "unexpected error: {err:#}"
    );
    // The existing pid file belongs to the running daemon; it stays.
    assert!(profile.pid_path.exists());
}

#[tokio::test]
async fn test_stop_without_pid_file_reports_not_running() {
    let profile = write_profile();

    stop::execute("default", profile.config(), false)
        .await
        .expect("stop");

    assert!(!profile.pid_path.exists());
}

#[tokio::test]
async fn test_stop_cleans_up_a_stale_pid_file() {
    let profile = write_profile();
    profile.write_pid(&DEAD_PID.to_string());

    stop::execute("default", profile.config(), false)
        .await
        .expect("stop");

    assert!(
        !profile.pid_path.exists(),
        "stale pid file should be removed"
    );
}

#[tokio::test]
async fn test_stop_never_signals_a_zeroed_pid_file() {
    let profile = write_profile();
    // A pid of 0 would SIGTERM this test's whole process group if it ever
    // reached kill(); it has to be treated as corrupt and cleaned up.
    profile.write_pid("0");

    stop::execute("default", profile.config(), false)
        .await
        .expect("stop");

    assert!(
        !profile.pid_path.exists(),
        "corrupt pid file should be removed"
    );
}

#[tokio::test]
async fn test_stop_cleans_up_a_garbage_pid_file() {
    let profile = write_profile();
    profile.write_pid("not-a-pid");

    stop::execute("default", profile.config(), true)
        .await
        .expect("stop");

    assert!(!profile.pid_path.exists());
}
