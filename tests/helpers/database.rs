use drover::adapters::sqlite::initialize_database;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Create a file-backed SQLite database for testing
///
/// File-backed rather than in-memory so that every connection in the pool
/// sees the same data, which is what the claim-contention tests need.
/// Keep the returned `TempDir` alive for the duration of the test; the
/// database file goes away with it.
pub async fn setup_test_db(max_connections: u32) -> (TempDir, SqlitePool) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("queue.db");
    let pool = initialize_database(
        path.to_str().expect("temp path should be utf-8"),
        max_connections,
    )
    .await
    .expect("failed to initialize test database");
    (dir, pool)
}

/// Teardown test database
///
/// Closes the connection pool and cleans up resources.
pub async fn teardown_test_db(pool: SqlitePool) {
    pool.close().await;
}
