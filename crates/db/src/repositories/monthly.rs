//! Monthly ledger repository: month resolution, listing, deletion and the
//! yearly data load.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tally_core::month::{ExpenseSnapshot, MonthTemplate, NewCategory};
use tally_core::summary::{ExpenseLine, IncomeLine, MonthLedger};
use tally_shared::{Amount, MonthConflictPolicy, MonthKey, Year};
use uuid::Uuid;

use super::{is_lock_contention, is_unique_violation};
use crate::entities::{expense_categories, income_sources, monthly_data};

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Month does not exist.
    #[error("Month not found: {0}")]
    MonthNotFound(String),

    /// Income source does not exist.
    #[error("Income source not found: {0}")]
    IncomeNotFound(Uuid),

    /// Expense category does not exist.
    #[error("Expense category not found: {0}")]
    ExpenseNotFound(Uuid),

    /// Month was created concurrently and the conflict policy rejects the loser.
    #[error("Month {0} was created by another request; reload it")]
    MonthExists(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A month row with its income and expense rows, each in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWithItems {
    /// The month row.
    pub month: monthly_data::Model,
    /// Income sources ordered by position.
    pub incomes: Vec<income_sources::Model>,
    /// Expense categories ordered by position.
    pub expenses: Vec<expense_categories::Model>,
}

/// Repository for monthly ledgers.
#[derive(Debug, Clone)]
pub struct MonthlyRepository {
    db: DatabaseConnection,
}

impl MonthlyRepository {
    /// Creates a new monthly repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a month row by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_month(&self, key: &MonthKey) -> Result<Option<monthly_data::Model>, DbErr> {
        monthly_data::Entity::find()
            .filter(monthly_data::Column::Month.eq(key.as_str()))
            .one(&self.db)
            .await
    }

    /// Finds a month with its items.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, key: &MonthKey) -> Result<Option<MonthWithItems>, DbErr> {
        let Some(month) = self.find_month(key).await? else {
            return Ok(None);
        };

        let incomes = income_sources::Entity::find()
            .filter(income_sources::Column::MonthlyDataId.eq(month.id))
            .order_by_asc(income_sources::Column::Position)
            .order_by_asc(income_sources::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let expenses = expense_categories::Entity::find()
            .filter(expense_categories::Column::MonthlyDataId.eq(month.id))
            .order_by_asc(expense_categories::Column::Position)
            .order_by_asc(expense_categories::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(Some(MonthWithItems {
            month,
            incomes,
            expenses,
        }))
    }

    /// Returns the month, creating it from its template when absent.
    ///
    /// # Errors
    ///
    /// Returns `MonthExists` when a concurrent creation wins and `policy` is
    /// `Reject`, or a database error.
    pub async fn get_or_create(
        &self,
        key: &MonthKey,
        policy: MonthConflictPolicy,
    ) -> Result<MonthWithItems, LedgerError> {
        if let Some(existing) = self.find(key).await? {
            return Ok(existing);
        }
        self.create_month(key, policy).await
    }

    /// Creates the month from its template.
    ///
    /// If another writer created the same month first, either the unique
    /// constraint fires or SQLite reports the database as locked. In both cases
    /// the month is re-read and `policy` decides the outcome.
    ///
    /// # Errors
    ///
    /// Returns `MonthExists` under `Reject` on a conflict, or a database error.
    pub async fn create_month(
        &self,
        key: &MonthKey,
        policy: MonthConflictPolicy,
    ) -> Result<MonthWithItems, LedgerError> {
        let err = match self.insert_from_template(key).await {
            Err(LedgerError::Database(err)) if lost_creation_race(&err) => err,
            other => return other,
        };

        let Some(existing) = self.find(key).await? else {
            return Err(err.into());
        };

        match policy {
            MonthConflictPolicy::ReturnExisting => {
                tracing::info!(month = %key, "Month created concurrently, returning existing row");
                Ok(existing)
            }
            MonthConflictPolicy::Reject => {
                tracing::info!(month = %key, "Month created concurrently, rejecting");
                Err(LedgerError::MonthExists(key.to_string()))
            }
        }
    }

    async fn insert_from_template(&self, key: &MonthKey) -> Result<MonthWithItems, LedgerError> {
        let txn = self.db.begin().await?;

        // Write first so the transaction holds the write lock before it reads.
        let now = Utc::now().into();
        let month = monthly_data::ActiveModel {
            id: Set(Uuid::new_v4()),
            month: Set(key.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let prior = Self::previous_categories(&txn, key).await?;
        let template = MonthTemplate::for_new_month(prior.as_deref());

        let mut expenses = Vec::with_capacity(template.categories.len());
        for category in template.categories {
            expenses.push(Self::insert_category(&txn, month.id, category).await?);
        }

        txn.commit().await?;

        tracing::info!(
            month = %key,
            source = ?template.source,
            categories = expenses.len(),
            "Created month"
        );

        Ok(MonthWithItems {
            month,
            incomes: Vec::new(),
            expenses,
        })
    }

    /// Categories of the closest earlier month, if any.
    async fn previous_categories(
        txn: &DatabaseTransaction,
        key: &MonthKey,
    ) -> Result<Option<Vec<ExpenseSnapshot>>, DbErr> {
        let Some(previous) = monthly_data::Entity::find()
            .filter(monthly_data::Column::Month.lt(key.as_str()))
            .order_by_desc(monthly_data::Column::Month)
            .one(txn)
            .await?
        else {
            return Ok(None);
        };

        let categories = expense_categories::Entity::find()
            .filter(expense_categories::Column::MonthlyDataId.eq(previous.id))
            .order_by_asc(expense_categories::Column::Position)
            .order_by_asc(expense_categories::Column::CreatedAt)
            .all(txn)
            .await?;

        Ok(Some(
            categories
                .into_iter()
                .map(|c| ExpenseSnapshot {
                    name: c.name,
                    budgeted: Amount::new(c.budgeted_amount),
                    actual: Amount::new(c.actual_amount),
                    is_paid: c.is_paid,
                    show_paid_status: c.show_paid_status,
                    position: c.position,
                })
                .collect(),
        ))
    }

    async fn insert_category(
        txn: &DatabaseTransaction,
        monthly_data_id: Uuid,
        category: NewCategory,
    ) -> Result<expense_categories::Model, DbErr> {
        let now = Utc::now().into();
        expense_categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            monthly_data_id: Set(monthly_data_id),
            name: Set(category.name),
            budgeted_amount: Set(category.budgeted.value()),
            actual_amount: Set(category.actual.value()),
            is_paid: Set(category.is_paid),
            show_paid_status: Set(category.show_paid_status),
            position: Set(category.position),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await
    }

    /// Lists all months, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<monthly_data::Model>, DbErr> {
        monthly_data::Entity::find()
            .order_by_desc(monthly_data::Column::Month)
            .all(&self.db)
            .await
    }

    /// Deletes a month with its income and expense rows in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `MonthNotFound` if the month does not exist, or a database error.
    pub async fn delete(&self, key: &MonthKey) -> Result<(), LedgerError> {
        let month = self
            .find_month(key)
            .await?
            .ok_or_else(|| LedgerError::MonthNotFound(key.to_string()))?;

        // Only writes inside the transaction, so it never waits to upgrade a read lock.
        let txn = self.db.begin().await?;

        let incomes = income_sources::Entity::delete_many()
            .filter(income_sources::Column::MonthlyDataId.eq(month.id))
            .exec(&txn)
            .await?;
        let expenses = expense_categories::Entity::delete_many()
            .filter(expense_categories::Column::MonthlyDataId.eq(month.id))
            .exec(&txn)
            .await?;
        let deleted = monthly_data::Entity::delete_by_id(month.id).exec(&txn).await?;
        if deleted.rows_affected == 0 {
            return Err(LedgerError::MonthNotFound(key.to_string()));
        }

        txn.commit().await?;

        tracing::info!(
            month = %key,
            incomes = incomes.rows_affected,
            expenses = expenses.rows_affected,
            "Deleted month"
        );
        Ok(())
    }

    /// Loads every month of `year` with its rows, ascending by month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn load_year(&self, year: &Year) -> Result<Vec<MonthLedger>, DbErr> {
        let months = monthly_data::Entity::find()
            .filter(monthly_data::Column::Month.starts_with(year.month_prefix()))
            .order_by_asc(monthly_data::Column::Month)
            .all(&self.db)
            .await?;

        if months.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = months.iter().map(|m| m.id).collect();

        let incomes = income_sources::Entity::find()
            .filter(income_sources::Column::MonthlyDataId.is_in(ids.clone()))
            .order_by_asc(income_sources::Column::Position)
            .all(&self.db)
            .await?;

        let expenses = expense_categories::Entity::find()
            .filter(expense_categories::Column::MonthlyDataId.is_in(ids))
            .order_by_asc(expense_categories::Column::Position)
            .order_by_asc(expense_categories::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut incomes_by_month: HashMap<Uuid, Vec<IncomeLine>> = HashMap::new();
        for income in incomes {
            incomes_by_month
                .entry(income.monthly_data_id)
                .or_default()
                .push(IncomeLine {
                    expected: Amount::new(income.expected_amount),
                    actual: Amount::new(income.actual_amount),
                });
        }

        let mut expenses_by_month: HashMap<Uuid, Vec<ExpenseLine>> = HashMap::new();
        for expense in expenses {
            expenses_by_month
                .entry(expense.monthly_data_id)
                .or_default()
                .push(ExpenseLine {
                    name: expense.name,
                    budgeted: Amount::new(expense.budgeted_amount),
                    actual: Amount::new(expense.actual_amount),
                });
        }

        months
            .into_iter()
            .map(|m| {
                let key: MonthKey = m
                    .month
                    .parse()
                    .map_err(|_| DbErr::Custom(format!("Stored month key is invalid: {}", m.month)))?;
                Ok(MonthLedger {
                    month: key,
                    incomes: incomes_by_month.remove(&m.id).unwrap_or_default(),
                    expenses: expenses_by_month.remove(&m.id).unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Distinct years that have at least one month, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_years(&self) -> Result<Vec<String>, DbErr> {
        let keys: Vec<String> = monthly_data::Entity::find()
            .select_only()
            .column(monthly_data::Column::Month)
            .into_tuple()
            .all(&self.db)
            .await?;

        let years: BTreeSet<String> = keys
            .iter()
            .filter_map(|key| key.get(..4))
            .map(str::to_string)
            .collect();

        Ok(years.into_iter().rev().collect())
    }
}

/// True when a month insert failed because a concurrent request got there first.
fn lost_creation_race(err: &DbErr) -> bool {
    is_unique_violation(err) || is_lock_contention(err)
}
