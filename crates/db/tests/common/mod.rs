//! Shared setup for repository integration tests.

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tempfile::TempDir;
use tally_db::{PoolOptions, connect, migration::Migrator};
use tally_shared::{MonthKey, Year};

/// Fresh in-memory SQLite database with all migrations applied.
///
/// A single pooled connection keeps every query on the same in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let db = connect(
        "sqlite::memory:",
        PoolOptions {
            max_connections: 1,
            min_connections: 1,
        },
    )
    .await
    .expect("Failed to open in-memory database");

    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

/// SQLite file in a fresh temporary directory, behind a pool of
/// `max_connections`, with all migrations applied.
///
/// Keep the returned directory alive for as long as the connection is used.
#[allow(dead_code)]
pub async fn setup_file_db(max_connections: u32) -> (TempDir, DatabaseConnection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("tally.db").display());

    let db = connect(
        &url,
        PoolOptions {
            max_connections,
            min_connections: 1,
        },
    )
    .await
    .expect("Failed to open file database");

    Migrator::up(&db, None).await.expect("Failed to run migrations");
    (dir, db)
}

pub fn month(key: &str) -> MonthKey {
    key.parse().expect("valid month key")
}

#[allow(dead_code)]
pub fn year(key: &str) -> Year {
    key.parse().expect("valid year")
}
