//! Worker process spawning.
//!
//! A worker is this same binary re-executed with the hidden `exec-task`
//! subcommand, so it gets real OS-process isolation: a handler crash or
//! leak cannot touch supervisor memory. Each spawned child is owned by a
//! waiter task that turns its exit into a [`SupervisorEvent::WorkerExited`]
//! on the supervisor's channel.

use crate::domain::models::Task;
use crate::services::supervisor::{SupervisorEvent, WorkerOutcome};
use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Port for turning a claimed task into a worker process.
///
/// Split out so supervisor tests can run against a spawner that fakes
/// worker lifecycles without real subprocesses.
#[async_trait]
pub trait WorkerSpawner: Send + Sync {
    /// Spawn a worker for `task`; returns its pid.
    ///
    /// The implementation must arrange for exactly one
    /// `WorkerExited { pid, .. }` to be sent on `events` once the worker
    /// finishes.
    async fn spawn(
        &self,
        task: &Task,
        events: mpsc::Sender<SupervisorEvent>,
    ) -> io::Result<i32>;
}

/// Spawns real worker processes via self-exec.
pub struct ProcessSpawner {
    profile: String,
    config_file: Option<PathBuf>,
}

impl ProcessSpawner {
    /// Workers re-load configuration themselves, so they need the same
    /// profile name and config file path the supervisor was started with.
    pub fn new(profile: impl Into<String>, config_file: Option<PathBuf>) -> Self {
        Self {
            profile: profile.into(),
            config_file,
        }
    }
}

#[async_trait]
impl WorkerSpawner for ProcessSpawner {
    async fn spawn(
        &self,
        task: &Task,
        events: mpsc::Sender<SupervisorEvent>,
    ) -> io::Result<i32> {
        let exe = std::env::current_exe()?;

        let mut command = Command::new(exe);
        command
            .arg("--profile")
            .arg(&self.profile)
            .arg("exec-task")
            .arg("--id")
            .arg(task.id.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(path) = &self.config_file {
            command.arg("--config").arg(path);
        }

        let mut child = command.spawn()?;
        let raw_pid = child
            .id()
            .ok_or_else(|| io::Error::other("spawned worker has no pid"))?;
        let pid = i32::try_from(raw_pid)
            .map_err(|_| io::Error::other("spawned worker pid out of range"))?;

        debug!(pid, task_id = %task.id, "Worker process spawned");

        // The waiter owns the child handle; tokio reaps the OS process
        // when wait() resolves, and the loop hears about it as an event.
        tokio::spawn(async move {
            let outcome = match child.wait().await {
                Ok(status) => status
                    .code()
                    .map_or(WorkerOutcome::Signaled, WorkerOutcome::Exited),
                Err(e) => {
                    error!(pid, error = %e, "Failed waiting on worker");
                    WorkerOutcome::Signaled
                }
            };
            let _ = events
                .send(SupervisorEvent::WorkerExited { pid, outcome })
                .await;
        });

        Ok(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{TaskId, TaskParams};
    use chrono::Utc;

    fn task_for(route: &str) -> Task {
        Task {
            id: TaskId(1),
            route: route.to_string(),
            params: TaskParams::new(),
            claimed: true,
            created_at: Utc::now(),
        }
    }

    /// Spawner that runs a plain shell command instead of re-executing
    /// the binary, to exercise the waiter plumbing with real processes.
    struct ShellSpawner(&'static str);

    #[async_trait]
    impl WorkerSpawner for ShellSpawner {
        async fn spawn(
            &self,
            _task: &Task,
            events: mpsc::Sender<SupervisorEvent>,
        ) -> io::Result<i32> {
            let mut child = Command::new("/bin/sh").arg("-c").arg(self.0).spawn()?;
            let pid = i32::try_from(child.id().ok_or_else(|| io::Error::other("no pid"))?)
                .map_err(|_| io::Error::other("pid out of range"))?;
            tokio::spawn(async move {
                let outcome = match child.wait().await {
                    Ok(status) => status
                        .code()
                        .map_or(WorkerOutcome::Signaled, WorkerOutcome::Exited),
                    Err(_) => WorkerOutcome::Signaled,
                };
                let _ = events
                    .send(SupervisorEvent::WorkerExited { pid, outcome })
                    .await;
            });
            Ok(pid)
        }
    }

    #[tokio::test]
    async fn test_waiter_reports_exit_code() {
        let (tx, mut rx) = mpsc::channel(4);
        let spawner = ShellSpawner("exit 0");
        let pid = spawner.spawn(&task_for("shell"), tx).await.expect("spawn");

        let event = rx.recv().await.expect("event");
        assert_eq!(
            event,
            SupervisorEvent::WorkerExited {
                pid,
                outcome: WorkerOutcome::Exited(0)
            }
        );
    }

    #[tokio::test]
    async fn test_waiter_reports_failure_code() {
        let (tx, mut rx) = mpsc::channel(4);
        let spawner = ShellSpawner("exit 7");
        let pid = spawner.spawn(&task_for("shell"), tx).await.expect("spawn");

        let event = rx.recv().await.expect("event");
        assert_eq!(
            event,
            SupervisorEvent::WorkerExited {
                pid,
                outcome: WorkerOutcome::Exited(7)
            }
        );
    }
}
