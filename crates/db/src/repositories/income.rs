//! Income source repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set,
};
use tally_shared::{Amount, MonthKey};
use uuid::Uuid;

use super::monthly::LedgerError;
use crate::entities::{income_sources, monthly_data};

/// Input for creating an income source.
#[derive(Debug, Clone)]
pub struct CreateIncomeInput {
    /// Display name.
    pub name: String,
    /// Expected amount.
    pub expected_amount: Amount,
    /// Amount received so far.
    pub actual_amount: Amount,
}

/// Partial update of an income source.
#[derive(Debug, Clone, Default)]
pub struct UpdateIncomeInput {
    /// New name.
    pub name: Option<String>,
    /// New expected amount.
    pub expected_amount: Option<Amount>,
    /// New actual amount.
    pub actual_amount: Option<Amount>,
}

/// Repository for income sources.
#[derive(Debug, Clone)]
pub struct IncomeRepository {
    db: DatabaseConnection,
}

impl IncomeRepository {
    /// Creates a new income repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends an income source to an existing month.
    ///
    /// # Errors
    ///
    /// Returns `MonthNotFound` if the month has not been created yet, or a
    /// database error.
    pub async fn create(
        &self,
        month: &MonthKey,
        input: CreateIncomeInput,
    ) -> Result<income_sources::Model, LedgerError> {
        let parent = monthly_data::Entity::find()
            .filter(monthly_data::Column::Month.eq(month.as_str()))
            .one(&self.db)
            .await?
            .ok_or_else(|| LedgerError::MonthNotFound(month.to_string()))?;

        let position = income_sources::Entity::find()
            .filter(income_sources::Column::MonthlyDataId.eq(parent.id))
            .count(&self.db)
            .await?;

        let now = Utc::now().into();
        let income = income_sources::ActiveModel {
            id: Set(Uuid::new_v4()),
            monthly_data_id: Set(parent.id),
            name: Set(input.name),
            expected_amount: Set(input.expected_amount.value()),
            actual_amount: Set(input.actual_amount.value()),
            position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::debug!(month = %month, income_id = %income.id, "Created income source");
        Ok(income)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns `IncomeNotFound` for an unknown id, or a database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateIncomeInput,
    ) -> Result<income_sources::Model, LedgerError> {
        let income = income_sources::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(LedgerError::IncomeNotFound(id))?;

        let mut active = income.into_active_model();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(amount) = input.expected_amount {
            active.expected_amount = Set(amount.value());
        }
        if let Some(amount) = input.actual_amount {
            active.actual_amount = Set(amount.value());
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an income source.
    ///
    /// # Errors
    ///
    /// Returns `IncomeNotFound` for an unknown id, or a database error.
    pub async fn delete(&self, id: Uuid) -> Result<(), LedgerError> {
        let result = income_sources::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(LedgerError::IncomeNotFound(id));
        }
        Ok(())
    }
}
