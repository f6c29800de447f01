//! Task domain model.
//!
//! A task is one unit of work: a handler route plus its invocation
//! parameters. Tasks live in the queue store until a worker has made
//! exactly one execution attempt, then they are deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a task in the queue store.
///
/// Assigned by the store at enqueue time and opaque to the daemon. Ids
/// increase monotonically, so claiming in id order is claiming in
/// insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Ordered key/value invocation parameters.
///
/// A sequence of pairs rather than a map: handlers see parameters in the
/// order the producer supplied them, and duplicate keys are preserved.
pub type TaskParams = Vec<(String, String)>;

/// First value recorded under `key`, if any.
pub fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Every parameter except those keyed `key`, in original order.
pub fn params_except<'a>(
    params: &'a [(String, String)],
    key: &'a str,
) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    params
        .iter()
        .filter(move |(k, _)| k != key)
        .map(|(k, v)| (k.as_str(), v.as_str()))
}

/// One unit of work queued for execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Handler route name, resolved by the worker's handler registry.
    pub route: String,
    /// Ordered invocation parameters.
    pub params: TaskParams,
    /// True while a dispatch loop holds the claim.
    pub claimed: bool,
    /// When the producer enqueued the task.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: TaskId(7),
            route: "shell".to_string(),
            params: vec![
                ("cmd".to_string(), "echo hi".to_string()),
                ("WORKDIR".to_string(), "/tmp".to_string()),
                ("cmd".to_string(), "ignored duplicate".to_string()),
            ],
            claimed: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_param_returns_first_match() {
        let task = sample_task();
        assert_eq!(param(&task.params, "cmd"), Some("echo hi"));
        assert_eq!(param(&task.params, "WORKDIR"), Some("/tmp"));
        assert_eq!(param(&task.params, "missing"), None);
    }

    #[test]
    fn test_params_except_drops_every_match() {
        let task = sample_task();
        // Both "cmd" entries go, the rest keep their order.
        let rest: Vec<_> = params_except(&task.params, "cmd").collect();
        assert_eq!(rest, vec![("WORKDIR", "/tmp")]);
    }

    #[test]
    fn test_task_id_display() {
        assert_eq!(TaskId(42).to_string(), "42");
    }
}
