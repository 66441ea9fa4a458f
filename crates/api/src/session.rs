//! Session stores and the session cookie.
//!
//! A session is an opaque random token handed to the browser in an httpOnly
//! cookie. Two backends implement [`SessionStore`]: the `sessions` table
//! (survives restarts) and an in-process map.

use std::sync::Arc;

use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use dashmap::DashMap;
use sea_orm::DatabaseConnection;
use tally_db::SessionRepository;
use tally_shared::config::{SessionConfig, SessionStoreKind};
use tally_shared::{AppError, AppResult, SessionUser, auth::SessionRecord};
use uuid::Uuid;

/// Storage for login sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Starts a session for `user` and returns its token.
    async fn create(&self, user: SessionUser, ttl: Duration) -> AppResult<String>;

    /// Resolves a token to its user; `None` if unknown or expired.
    async fn load(&self, token: &str) -> AppResult<Option<SessionUser>>;

    /// Ends the session for `token`, if any.
    async fn destroy(&self, token: &str) -> AppResult<()>;

    /// Makes live sessions of `user_id` report the new username.
    async fn rename_user(&self, user_id: Uuid, username: &str) -> AppResult<()>;

    /// Drops expired sessions and returns how many were removed.
    async fn purge_expired(&self) -> AppResult<u64>;
}

/// Builds the store selected by configuration.
#[must_use]
pub fn build_store(config: &SessionConfig, db: DatabaseConnection) -> Arc<dyn SessionStore> {
    match config.store {
        SessionStoreKind::Database => Arc::new(DatabaseSessionStore::new(db)),
        SessionStoreKind::Memory => Arc::new(MemorySessionStore::default()),
    }
}

/// Sessions persisted in the `sessions` table.
#[derive(Debug, Clone)]
pub struct DatabaseSessionStore {
    repo: SessionRepository,
}

impl DatabaseSessionStore {
    /// Creates a store over `db`.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            repo: SessionRepository::new(db),
        }
    }
}

#[async_trait]
impl SessionStore for DatabaseSessionStore {
    async fn create(&self, user: SessionUser, ttl: Duration) -> AppResult<String> {
        let (token, _) = self
            .repo
            .create(user.user_id, Utc::now() + ttl)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(token)
    }

    async fn load(&self, token: &str) -> AppResult<Option<SessionUser>> {
        let found = self
            .repo
            .find_by_token(token, Utc::now())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(found.map(|(_, user)| SessionUser::new(user.id, user.username)))
    }

    async fn destroy(&self, token: &str) -> AppResult<()> {
        self.repo
            .delete_by_token(token)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // The username is joined from `users` on every load.
    async fn rename_user(&self, _user_id: Uuid, _username: &str) -> AppResult<()> {
        Ok(())
    }

    async fn purge_expired(&self) -> AppResult<u64> {
        self.repo
            .purge_expired(Utc::now())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Sessions held in process memory, keyed by token hash.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, SessionRecord>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user: SessionUser, ttl: Duration) -> AppResult<String> {
        let token = SessionRepository::generate_token();
        self.sessions.insert(
            SessionRepository::hash_token(&token),
            SessionRecord {
                user,
                expires_at: Utc::now() + ttl,
            },
        );
        Ok(token)
    }

    async fn load(&self, token: &str) -> AppResult<Option<SessionUser>> {
        let key = SessionRepository::hash_token(token);
        let now = Utc::now();
        let user = self
            .sessions
            .get(&key)
            .filter(|record| !record.is_expired(now))
            .map(|record| record.user.clone());
        Ok(user)
    }

    async fn destroy(&self, token: &str) -> AppResult<()> {
        self.sessions.remove(&SessionRepository::hash_token(token));
        Ok(())
    }

    async fn rename_user(&self, user_id: Uuid, username: &str) -> AppResult<()> {
        for mut record in self.sessions.iter_mut() {
            if record.user.user_id == user_id {
                record.user.username = username.to_string();
            }
        }
        Ok(())
    }

    async fn purge_expired(&self) -> AppResult<u64> {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, record| !record.is_expired(now));
        Ok(u64::try_from(before - self.sessions.len()).unwrap_or(u64::MAX))
    }
}

/// Reads the session token from the request cookies.
#[must_use]
pub fn session_token(jar: &CookieJar, config: &SessionConfig) -> Option<String> {
    jar.get(&config.cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Cookie carrying a fresh session token.
#[must_use]
pub fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::days(config.ttl_days))
        .secure(config.secure)
        .build()
}

/// Cookie that makes the browser drop the session cookie.
#[must_use]
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::ZERO)
        .secure(config.secure)
        .build()
}
