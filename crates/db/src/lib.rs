//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! SQLite is the default store; PostgreSQL is selected by a `postgres://` URL.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    ExpenseRepository, IncomeRepository, LedgerError, MonthlyRepository, SavingsError,
    SavingsRepository, SessionRepository, UserError, UserRepository,
};

use std::time::Duration;

use sea_orm::sqlx::sqlite::SqliteJournalMode;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Connection pool settings.
#[derive(Debug, Clone, Copy)]
pub struct PoolOptions {
    /// Upper bound on open connections.
    pub max_connections: u32,
    /// Connections kept open when idle.
    pub min_connections: u32,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
        }
    }
}

/// How long an SQLite connection waits for a lock before giving up.
const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Establishes a connection to the database.
///
/// File-backed SQLite databases run in WAL mode so readers do not block the
/// writer; every SQLite connection waits up to [`SQLITE_BUSY_TIMEOUT`] for locks.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, pool: PoolOptions) -> Result<DatabaseConnection, DbErr> {
    let file_backed = !is_memory_url(database_url);

    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(pool.max_connections)
        .min_connections(pool.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false)
        .map_sqlx_sqlite_opts(move |opts| {
            let opts = opts.busy_timeout(SQLITE_BUSY_TIMEOUT);
            if file_backed {
                opts.journal_mode(SqliteJournalMode::Wal)
            } else {
                opts
            }
        });

    Database::connect(options).await
}

/// Database URL safe to log: user info and query parameters are removed.
#[must_use]
pub fn redact_url(url: &str) -> String {
    let url = url.split(['?', '#']).next().unwrap_or_default();
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    let strip_user = |authority: &str| -> String {
        authority
            .rsplit_once('@')
            .map_or(authority, |(_, host)| host)
            .to_string()
    };

    match rest.split_once('/') {
        Some((authority, path)) => format!("{scheme}://{}/{path}", strip_user(authority)),
        None => format!("{scheme}://{}", strip_user(rest)),
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
