//! Session repository for database operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::entities::{sessions, users};

/// Random bytes per session token.
const TOKEN_BYTES: usize = 32;

/// Session repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    /// Creates a new session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Generates a new opaque, URL-safe session token.
    #[must_use]
    pub fn generate_token() -> String {
        let bytes: [u8; TOKEN_BYTES] = rand::random();
        base64_url::encode(&bytes)
    }

    /// Hashes a session token for storage.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Creates a session for `user_id` and returns the clear token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(String, sessions::Model), DbErr> {
        let token = Self::generate_token();
        let session = sessions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            token_hash: Set(Self::hash_token(&token)),
            expires_at: Set(expires_at.into()),
            created_at: Set(Utc::now().into()),
        };

        let session = session.insert(&self.db).await?;
        Ok((token, session))
    }

    /// Finds the live session for `token` together with its user.
    ///
    /// Expired sessions are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<(sessions::Model, users::Model)>, DbErr> {
        let found = sessions::Entity::find()
            .filter(sessions::Column::TokenHash.eq(Self::hash_token(token)))
            .find_also_related(users::Entity)
            .one(&self.db)
            .await?;

        Ok(match found {
            Some((session, Some(user))) if session.expires_at > now => Some((session, user)),
            _ => None,
        })
    }

    /// Deletes the session for `token`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_by_token(&self, token: &str) -> Result<bool, DbErr> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::TokenHash.eq(Self::hash_token(token)))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Deletes sessions that expired before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DbErr> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = now.into();
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
