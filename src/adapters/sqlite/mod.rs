//! SQLite adapter for the drover queue store.

pub mod connection;
pub mod migrations;
pub mod queue_store;

pub use connection::{create_pool, create_test_pool, ConnectionError};
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use queue_store::SqliteQueueStore;

use sqlx::SqlitePool;

/// Failures while bringing the queue database up.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
}

/// Open the queue database and apply pending migrations.
pub async fn initialize_database(
    path: &str,
    max_connections: u32,
) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(path, max_connections).await?;
    let migrator = Migrator::new(pool.clone());
    migrator
        .run_embedded_migrations(all_embedded_migrations())
        .await?;
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator
        .run_embedded_migrations(all_embedded_migrations())
        .await?;
    Ok(pool)
}
