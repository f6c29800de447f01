use chrono::Utc;
use drover::domain::models::TaskId;
use drover::services::WorkerPool;
use proptest::prelude::*;

proptest! {
    /// Property: the pool never exceeds its ceiling
    ///
    /// For any interleaving of register-when-allowed and reap operations,
    /// gating registration on can_spawn keeps len within max_concurrency.
    #[test]
    fn prop_pool_never_exceeds_ceiling(
        max_concurrency in 1usize..8,
        ops in prop::collection::vec(any::<bool>(), 1..200),
    ) {
        let mut pool = WorkerPool::new(max_concurrency);
        let mut next_pid = 1i32;
        let mut live: Vec<i32> = Vec::new();

        for register in ops {
            if register {
                if pool.can_spawn() {
                    pool.register(next_pid, TaskId(i64::from(next_pid)), Utc::now());
                    live.push(next_pid);
                    next_pid += 1;
                }
            } else if let Some(pid) = live.pop() {
                prop_assert!(pool.reap(pid).is_some());
            }

            prop_assert!(pool.len() <= max_concurrency);
            prop_assert_eq!(pool.len(), live.len());
            prop_assert_eq!(pool.can_spawn(), live.len() < max_concurrency);
        }
    }

    /// Property: reap returns each record exactly once
    ///
    /// Reaping hands back the record for a registered pid, and a second
    /// reap of the same pid finds nothing.
    #[test]
    fn prop_reap_returns_record_exactly_once(
        pids in prop::collection::hash_set(1i32..10_000, 1..50),
    ) {
        let pids: Vec<i32> = pids.into_iter().collect();
        let mut pool = WorkerPool::new(pids.len());

        for &pid in &pids {
            pool.register(pid, TaskId(i64::from(pid)), Utc::now());
        }
        prop_assert_eq!(pool.active_pids().len(), pids.len());

        for &pid in &pids {
            let record = pool.reap(pid);
            prop_assert!(record.is_some());
            prop_assert_eq!(record.map(|r| r.task_id), Some(TaskId(i64::from(pid))));
            prop_assert!(pool.reap(pid).is_none());
        }
        prop_assert!(pool.is_empty());
    }
}
