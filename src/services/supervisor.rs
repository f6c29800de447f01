//! The daemon supervisor.
//!
//! One control loop owns everything mutable: the worker pool, the state
//! machine, and the event channel's receiving end. Signals and worker
//! exits arrive as [`SupervisorEvent`]s; nothing else touches the pool,
//! so the claim-spawn-reap cycle needs no locks.
//!
//! Lifecycle: `Running` ticks claim-and-spawn under the concurrency
//! ceiling; a terminate request moves to `Draining`, which signals live
//! workers with bounded retries; then the pid file is removed and the
//! loop ends `Terminated`.

use crate::domain::errors::SupervisorError;
use crate::domain::models::{Config, Task};
use crate::domain::ports::QueueStore;
use crate::infrastructure::process::PidFile;
use crate::services::spawner::WorkerSpawner;
use crate::services::worker_pool::WorkerPool;
use chrono::Utc;
use nix::sys::signal::{kill, Signal};
use nix::unistd::{getpid, Pid};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// How a worker process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// Exited on its own with this status code.
    Exited(i32),
    /// Terminated by a signal, no status code.
    Signaled,
}

/// Events consumed by the dispatch loop.
///
/// The loop is the single consumer; producers are the per-worker waiter
/// tasks and the signal bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorEvent {
    /// A worker process finished and can be reaped.
    WorkerExited { pid: i32, outcome: WorkerOutcome },
    /// SIGTERM (or SIGINT) arrived: stop claiming, start the drain.
    TerminateRequested,
}

/// Dispatch loop states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SupervisorState {
    /// Claiming and spawning.
    Running,
    /// Terminate observed: no new claims, workers being signaled.
    Draining,
    /// Drain finished, loop exits.
    Terminated,
}

/// What a finished run looked like, for the caller's exit handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Workers still alive when the drain gave up. Zero on a clean
    /// shutdown; non-zero is reported but is not a failure.
    pub residual_workers: usize,
}

/// Handle for requesting shutdown from outside the loop.
#[derive(Clone)]
pub struct SupervisorHandle {
    events: mpsc::Sender<SupervisorEvent>,
}

impl SupervisorHandle {
    /// Ask the supervisor to drain and exit, as a delivered SIGTERM would.
    pub async fn terminate(&self) {
        let _ = self.events.send(SupervisorEvent::TerminateRequested).await;
    }
}

/// The daemon supervisor: dispatch loop, worker pool, drain.
pub struct Supervisor<S, W>
where
    S: QueueStore,
    W: WorkerSpawner,
{
    store: Arc<S>,
    spawner: Arc<W>,
    config: Config,
    pid_file: PidFile,
    pool: WorkerPool,
    state: SupervisorState,
    events_tx: mpsc::Sender<SupervisorEvent>,
    events_rx: mpsc::Receiver<SupervisorEvent>,
}

impl<S, W> Supervisor<S, W>
where
    S: QueueStore,
    W: WorkerSpawner,
{
    pub fn new(store: Arc<S>, spawner: Arc<W>, config: Config, pid_file: PidFile) -> Self {
        let (events_tx, events_rx) = mpsc::channel(100);
        let pool = WorkerPool::new(config.max_concurrency);
        Self {
            store,
            spawner,
            config,
            pid_file,
            pool,
            state: SupervisorState::Running,
            events_tx,
            events_rx,
        }
    }

    /// Handle for requesting shutdown; this is where the signal bridge
    /// plugs in.
    pub fn handle(&self) -> SupervisorHandle {
        SupervisorHandle {
            events: self.events_tx.clone(),
        }
    }

    /// Run until terminated.
    ///
    /// Writes our own pid into the pid file up front, runs the dispatch
    /// loop, and removes the pid file as the very last step on every
    /// exit path, clean or not.
    pub async fn run(mut self) -> Result<RunSummary, SupervisorError> {
        let own_pid = getpid().as_raw();
        self.pid_file.write(own_pid)?;
        info!(
            pid = own_pid,
            max_concurrency = self.pool.max_concurrency(),
            poll_interval_micros = self.config.poll_interval_micros,
            "Daemon started"
        );

        let result = self.run_loop().await;

        if let Err(e) = self.pid_file.remove() {
            error!(error = %e, "Failed to remove pid file");
        }

        match &result {
            Ok(summary) => info!(residual_workers = summary.residual_workers, "Daemon exited"),
            Err(e) => error!(error = %e, "Daemon exited with error"),
        }
        result
    }

    async fn run_loop(&mut self) -> Result<RunSummary, SupervisorError> {
        loop {
            match self.state {
                SupervisorState::Running => self.tick().await?,
                SupervisorState::Draining => {
                    let residual_workers = self.drain().await;
                    self.state = SupervisorState::Terminated;
                    return Ok(RunSummary { residual_workers });
                }
                SupervisorState::Terminated => {
                    return Ok(RunSummary { residual_workers: 0 });
                }
            }
        }
    }

    /// One `Running` tick: absorb events, then claim-and-spawn if a slot
    /// is free, else sleep out the poll interval.
    async fn tick(&mut self) -> Result<(), SupervisorError> {
        self.consume_pending_events();
        if self.state != SupervisorState::Running {
            return Ok(());
        }

        // Claim is gated on capacity so a saturated pool never strands a
        // claimed task.
        if self.pool.can_spawn() {
            if let Some(task) = self.store.claim_next().await? {
                self.spawn_worker(task).await?;
                // Go straight for the next task; idle sleep only when
                // the queue is empty or the pool is full.
                return Ok(());
            }
        }

        self.idle_sleep().await;
        Ok(())
    }

    /// Apply every event already sitting in the channel.
    fn consume_pending_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.on_event(event);
        }
    }

    fn on_event(&mut self, event: SupervisorEvent) {
        match event {
            SupervisorEvent::WorkerExited { pid, outcome } => {
                if let Some(record) = self.pool.reap(pid) {
                    info!(
                        pid,
                        task_id = %record.task_id,
                        ?outcome,
                        active = self.pool.len(),
                        "Worker exited"
                    );
                } else {
                    debug!(pid, "Exit event for unknown worker");
                }
            }
            SupervisorEvent::TerminateRequested => {
                if self.state == SupervisorState::Running {
                    info!(active = self.pool.len(), "Terminate requested, draining");
                    self.state = SupervisorState::Draining;
                } else {
                    debug!("Terminate requested while already draining");
                }
            }
        }
    }

    /// Sleep the poll interval, waking early for any event.
    async fn idle_sleep(&mut self) {
        let sleep = tokio::time::sleep(self.config.poll_interval());
        tokio::pin!(sleep);
        tokio::select! {
            _ = &mut sleep => {}
            maybe = self.events_rx.recv() => {
                if let Some(event) = maybe {
                    self.on_event(event);
                }
            }
        }
    }

    async fn spawn_worker(&mut self, task: Task) -> Result<(), SupervisorError> {
        let started_at = Utc::now();
        match self.spawner.spawn(&task, self.events_tx.clone()).await {
            Ok(pid) => {
                self.pool.register(pid, task.id, started_at);
                info!(
                    pid,
                    task_id = %task.id,
                    route = %task.route,
                    active = self.pool.len(),
                    "Spawned worker"
                );
                Ok(())
            }
            Err(source) => {
                error!(task_id = %task.id, error = %source, "Failed to spawn worker");
                // Give the claim back so the task is not stranded; this
                // supervisor is about to die either way.
                if let Err(release_err) = self.store.release(task.id).await {
                    error!(
                        task_id = %task.id,
                        error = %release_err,
                        "Failed to release claim after spawn failure"
                    );
                }
                Err(SupervisorError::SpawnFailed {
                    task_id: task.id,
                    source,
                })
            }
        }
    }

    /// Signal every live worker, up to `max_attempts` passes with
    /// `retry_delay` between them. Worker-exited events keep shrinking
    /// the pool during each sleep. Returns how many workers remained.
    async fn drain(&mut self) -> usize {
        let max_attempts = self.config.drain.max_attempts;
        let retry_delay = self.config.drain.retry_delay();
        info!(
            active = self.pool.len(),
            max_attempts,
            retry_delay_ms = self.config.drain.retry_delay_ms,
            "Draining workers"
        );

        let mut attempts = 0;
        while attempts < max_attempts && !self.pool.is_empty() {
            attempts += 1;
            for pid in self.pool.active_pids() {
                debug!(pid, attempt = attempts, "Signaling worker");
                if let Err(e) = kill(Pid::from_raw(pid), Signal::SIGTERM) {
                    // Usually ESRCH: the worker died and its exit event
                    // has not been consumed yet.
                    debug!(pid, error = %e, "Signal delivery failed");
                }
            }
            self.sleep_consuming_events(retry_delay).await;
        }

        let residual = self.pool.len();
        if residual > 0 {
            error!(
                residual,
                pids = ?self.pool.active_pids(),
                "Could not terminate all workers"
            );
        } else {
            info!(attempts, "All workers exited");
        }
        residual
    }

    /// Sleep for `duration` while still consuming events, so reaping
    /// continues during drain waits. Returns early once the pool is
    /// empty.
    async fn sleep_consuming_events(&mut self, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => break,
                maybe = self.events_rx.recv() => {
                    match maybe {
                        Some(event) => self.on_event(event),
                        None => break,
                    }
                }
            }
            if self.pool.is_empty() {
                break;
            }
        }
    }
}
