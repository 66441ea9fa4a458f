//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod expense;
pub mod income;
pub mod monthly;
pub mod savings;
pub mod session;
pub mod user;

pub use expense::{CreateExpenseInput, ExpenseRepository, UpdateExpenseInput};
pub use income::{CreateIncomeInput, IncomeRepository, UpdateIncomeInput};
pub use monthly::{LedgerError, MonthWithItems, MonthlyRepository};
pub use savings::{
    CreateSavingsGoalInput, SavingsError, SavingsRepository, UpdateSavingsGoalInput,
};
pub use session::SessionRepository;
pub use user::{UpdateCredentialsInput, UserError, UserRepository};

use sea_orm::sqlx::{self, error::DatabaseError, sqlite::SqliteError};
use sea_orm::{DbErr, RuntimeErr, SqlErr};

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Returns true if `err` is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Returns true if SQLite gave up waiting for a lock (`SQLITE_BUSY`/`SQLITE_LOCKED`,
/// extended codes included).
pub(crate) fn is_lock_contention(err: &DbErr) -> bool {
    let (DbErr::Conn(RuntimeErr::SqlxError(sqlx::Error::Database(db_err)))
    | DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db_err)))
    | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db_err)))) = err
    else {
        return false;
    };

    db_err
        .try_downcast_ref::<SqliteError>()
        .and_then(|sqlite| sqlite.code())
        .and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
}
