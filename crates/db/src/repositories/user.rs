//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};
use uuid::Uuid;

use super::is_unique_violation;
use crate::entities::users;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Username already belongs to another user.
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Columns to change on a user row. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateCredentialsInput {
    /// New username, already trimmed.
    pub username: Option<String>,
    /// New password hash.
    pub password_hash: Option<String>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by exact username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns `UsernameTaken` if the username exists, or a database error.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<users::Model, UserError> {
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await.map_err(|err| {
            if is_unique_violation(&err) {
                UserError::UsernameTaken(username.to_string())
            } else {
                UserError::Database(err)
            }
        })
    }

    /// Checks whether a user other than `except` already uses `username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn username_taken(&self, username: &str, except: Uuid) -> Result<bool, DbErr> {
        let existing = self.find_by_username(username).await?;
        Ok(existing.is_some_and(|user| user.id != except))
    }

    /// Updates username and/or password hash in a single row update.
    ///
    /// A unique violation on the username, for instance from a concurrent
    /// rename, is reported as `UsernameTaken`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `UsernameTaken`, or a database error.
    pub async fn update_credentials(
        &self,
        id: Uuid,
        input: UpdateCredentialsInput,
    ) -> Result<users::Model, UserError> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        let mut active = user.into_active_model();
        if let Some(username) = &input.username {
            active.username = Set(username.clone());
        }
        if let Some(hash) = input.password_hash {
            active.password_hash = Set(hash);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map_err(|err| {
            if is_unique_violation(&err) {
                UserError::UsernameTaken(input.username.unwrap_or_default())
            } else {
                UserError::Database(err)
            }
        })
    }
}
