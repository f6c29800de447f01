//! SQLite implementation of the QueueStore port.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::models::{Task, TaskId, TaskParams};
use crate::domain::ports::QueueStore;

/// Task queue backed by a shared SQLite file.
///
/// Claim atomicity rests on the single guarded UPDATE in
/// [`claim_next`](QueueStore::claim_next); everything else is plain row
/// traffic.
#[derive(Clone)]
pub struct SqliteQueueStore {
    pool: SqlitePool,
}

impl SqliteQueueStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueStore for SqliteQueueStore {
    /// Atomically claim the oldest unclaimed task.
    ///
    /// Find-and-mark is one guarded UPDATE: the subselect picks the oldest
    /// unclaimed row under the same write lock that flips its flag, so two
    /// concurrent claimers can never both get the same task. A statement
    /// that starts as a write also sidesteps the snapshot-upgrade errors a
    /// read-then-write transaction can hit under contention.
    async fn claim_next(&self) -> StoreResult<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as(
            r#"
            UPDATE tasks SET claimed = 1
            WHERE id = (
                SELECT id FROM tasks
                WHERE claimed = 0
                ORDER BY id ASC
                LIMIT 1
            )
            AND claimed = 0
            RETURNING id, route, params, claimed, created_at
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(task_row) = row else {
            debug!("No unclaimed tasks");
            return Ok(None);
        };

        let task = Task::try_from(task_row)?;
        info!(task_id = %task.id, route = %task.route, "Claimed task");
        Ok(Some(task))
    }

    /// Deleting an absent id is a no-op by contract.
    async fn delete(&self, id: TaskId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!(task_id = %id, "Delete found no row (already gone)");
        }
        Ok(())
    }

    async fn count_all(&self) -> StoreResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn enqueue(&self, route: &str, params: TaskParams) -> StoreResult<TaskId> {
        let params_json = serde_json::to_string(&params)?;
        let result = sqlx::query(
            r#"
            INSERT INTO tasks (route, params, claimed, created_at)
            VALUES (?, ?, 0, ?)
            "#,
        )
        .bind(route)
        .bind(&params_json)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        let id = TaskId(result.last_insert_rowid());
        debug!(task_id = %id, route, "Enqueued task");
        Ok(id)
    }

    async fn get(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Task::try_from).transpose()
    }

    async fn list(&self, limit: u32) -> StoreResult<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            r#"
            SELECT * FROM tasks
            ORDER BY id ASC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn release(&self, id: TaskId) -> StoreResult<()> {
        let result = sqlx::query("UPDATE tasks SET claimed = 0 WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!(task_id = %id, "Release found no row");
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i64,
    route: String,
    params: String,
    claimed: i64,
    created_at: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let params: TaskParams = serde_json::from_str(&row.params)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let created_at = chrono::DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| StoreError::Serialization(e.to_string()))?
            .with_timezone(&chrono::Utc);

        Ok(Task {
            id: TaskId(row.id),
            route: row.route,
            params,
            claimed: row.claimed != 0,
            created_at,
        })
    }
}
