//! Savings goal repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, QueryOrder, Set,
};
use tally_shared::Amount;
use uuid::Uuid;

use crate::entities::savings_goals;

/// Error types for savings operations.
#[derive(Debug, thiserror::Error)]
pub enum SavingsError {
    /// Savings goal not found.
    #[error("Savings goal not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a savings goal.
#[derive(Debug, Clone)]
pub struct CreateSavingsGoalInput {
    /// Goal name.
    pub name: String,
    /// Amount to reach.
    pub target_amount: Amount,
    /// Amount saved so far.
    pub current_amount: Amount,
}

/// Partial update of a savings goal.
#[derive(Debug, Clone, Default)]
pub struct UpdateSavingsGoalInput {
    /// New name.
    pub name: Option<String>,
    /// New target.
    pub target_amount: Option<Amount>,
    /// New saved amount.
    pub current_amount: Option<Amount>,
}

/// Repository for savings goals.
#[derive(Debug, Clone)]
pub struct SavingsRepository {
    db: DatabaseConnection,
}

impl SavingsRepository {
    /// Creates a new savings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all goals, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<savings_goals::Model>, DbErr> {
        savings_goals::Entity::find()
            .order_by_asc(savings_goals::Column::CreatedAt)
            .order_by_asc(savings_goals::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a goal by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, or a database error.
    pub async fn get(&self, id: Uuid) -> Result<savings_goals::Model, SavingsError> {
        savings_goals::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(SavingsError::NotFound(id))
    }

    /// Creates a goal.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        input: CreateSavingsGoalInput,
    ) -> Result<savings_goals::Model, SavingsError> {
        let now = Utc::now().into();
        let goal = savings_goals::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            target_amount: Set(input.target_amount.value()),
            current_amount: Set(input.current_amount.value()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::debug!(goal_id = %goal.id, "Created savings goal");
        Ok(goal)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, or a database error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateSavingsGoalInput,
    ) -> Result<savings_goals::Model, SavingsError> {
        let mut active = self.get(id).await?.into_active_model();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(amount) = input.target_amount {
            active.target_amount = Set(amount.value());
        }
        if let Some(amount) = input.current_amount {
            active.current_amount = Set(amount.value());
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a goal.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, or a database error.
    pub async fn delete(&self, id: Uuid) -> Result<(), SavingsError> {
        let result = savings_goals::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(SavingsError::NotFound(id));
        }
        Ok(())
    }
}
