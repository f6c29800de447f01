//! Worker pool bookkeeping.
//!
//! The pool is owned exclusively by the dispatch loop; every mutation
//! happens on that one task, so there is no locking here. The
//! concurrency ceiling is enforced by claiming only while `can_spawn()`
//! holds.

use crate::domain::models::TaskId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// One live worker process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRecord {
    /// Task the worker is executing.
    pub task_id: TaskId,
    /// When the worker was spawned.
    pub started_at: DateTime<Utc>,
}

/// In-flight worker records keyed by pid.
#[derive(Debug)]
pub struct WorkerPool {
    max_concurrency: usize,
    workers: HashMap<i32, WorkerRecord>,
}

impl WorkerPool {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency,
            workers: HashMap::new(),
        }
    }

    /// True iff another worker fits under the ceiling.
    pub fn can_spawn(&self) -> bool {
        self.workers.len() < self.max_concurrency
    }

    /// Record a freshly spawned worker.
    pub fn register(&mut self, pid: i32, task_id: TaskId, started_at: DateTime<Utc>) {
        debug_assert!(self.can_spawn(), "registered past the concurrency ceiling");
        self.workers.insert(pid, WorkerRecord { task_id, started_at });
    }

    /// Remove a worker on exit. Returns its record, or `None` for a pid
    /// the pool never knew (already reaped, or not ours).
    pub fn reap(&mut self, pid: i32) -> Option<WorkerRecord> {
        self.workers.remove(&pid)
    }

    /// Snapshot of live pids for the drain loop.
    pub fn active_pids(&self) -> Vec<i32> {
        self.workers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub const fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
}
