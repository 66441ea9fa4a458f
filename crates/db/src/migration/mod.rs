//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written with SeaQuery so
//! the same schema applies to both SQLite and PostgreSQL.

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_ledger;
mod m20250101_000002_users_sessions;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_ledger::Migration),
            Box::new(m20250101_000002_users_sessions::Migration),
        ]
    }
}
