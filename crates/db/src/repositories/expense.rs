//! Expense category repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set,
};
use tally_shared::{Amount, MonthKey};
use uuid::Uuid;

use super::monthly::LedgerError;
use crate::entities::{expense_categories, monthly_data};

/// Input for creating an expense category.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Display name.
    pub name: String,
    /// Budgeted amount.
    pub budgeted_amount: Amount,
    /// Amount spent so far.
    pub actual_amount: Amount,
    /// Paid flag.
    pub is_paid: bool,
    /// Whether the UI shows the paid toggle.
    pub show_paid_status: bool,
}

/// Partial update of an expense category.
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    /// New name.
    pub name: Option<String>,
    /// New budget.
    pub budgeted_amount: Option<Amount>,
    /// New actual spend.
    pub actual_amount: Option<Amount>,
    /// New paid flag.
    pub is_paid: Option<bool>,
    /// New paid-toggle visibility.
    pub show_paid_status: Option<bool>,
}

/// Repository for expense categories.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends an expense category to an existing month.
    ///
    /// # Errors
    ///
    /// Returns `MonthNotFound` if the month has not been created yet, or a
    /// database error.
    pub async fn create(
        &self,
        month: &MonthKey,
        input: CreateExpenseInput,
    ) -> Result<expense_categories::Model, LedgerError> {
        let parent = monthly_data::Entity::find()
            .filter(monthly_data::Column::Month.eq(month.as_str()))
            .one(&self.db)
            .await?
            .ok_or_else(|| LedgerError::MonthNotFound(month.to_string()))?;

        let position = expense_categories::Entity::find()
            .filter(expense_categories::Column::MonthlyDataId.eq(parent.id))
            .count(&self.db)
            .await?;

        let now = Utc::now().into();
        let expense = expense_categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            monthly_data_id: Set(parent.id),
            name: Set(input.name),
            budgeted_amount: Set(input.budgeted_amount.value()),
            actual_amount: Set(input.actual_amount.value()),
            is_paid: Set(input.is_paid),
            show_paid_status: Set(input.show_paid_status),
            position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::debug!(month = %month, expense_id = %expense.id, "Created expense category");
        Ok(expense)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseNotFound` for an unknown id, or a database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateExpenseInput,
    ) -> Result<expense_categories::Model, LedgerError> {
        let expense = expense_categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(LedgerError::ExpenseNotFound(id))?;

        let mut active = expense.into_active_model();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(amount) = input.budgeted_amount {
            active.budgeted_amount = Set(amount.value());
        }
        if let Some(amount) = input.actual_amount {
            active.actual_amount = Set(amount.value());
        }
        if let Some(paid) = input.is_paid {
            active.is_paid = Set(paid);
        }
        if let Some(show) = input.show_paid_status {
            active.show_paid_status = Set(show);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an expense category.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseNotFound` for an unknown id, or a database error.
    pub async fn delete(&self, id: Uuid) -> Result<(), LedgerError> {
        let result = expense_categories::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(LedgerError::ExpenseNotFound(id));
        }
        Ok(())
    }
}
