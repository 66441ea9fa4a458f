//! Test harness driving the router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tally_api::{AppState, create_router, session::build_store};
use tally_core::auth::{HashCost, hash_password};
use tally_db::{PoolOptions, UserRepository, connect, migration::Migrator};
use tally_shared::{AppConfig, config::AuthConfig};
use tower::ServiceExt;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "correct-horse";

/// Cheap Argon2 parameters so tests stay fast.
const TEST_AUTH: AuthConfig = AuthConfig {
    memory_kib: 1024,
    iterations: 1,
    parallelism: 1,
};

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    pub async fn with_config(mut config: AppConfig) -> Self {
        config.auth = TEST_AUTH;

        let db = connect(
            "sqlite::memory:",
            PoolOptions {
                max_connections: 1,
                min_connections: 1,
            },
        )
        .await
        .expect("Failed to open in-memory database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let hash = hash_password(PASSWORD, HashCost::from(&TEST_AUTH)).unwrap();
        UserRepository::new(db.clone())
            .create(USERNAME, &hash)
            .await
            .expect("Failed to seed user");

        let state = AppState {
            db: Arc::new(db.clone()),
            sessions: build_store(&config.session, db.clone()),
            config: Arc::new(config),
        };

        Self {
            router: create_router(state),
            db,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            set_cookie,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: &str) -> TestResponse {
        self.request("GET", uri, None, Some(cookie)).await
    }

    /// Logs in with the given credentials and returns the `name=value` cookie pair.
    pub async fn login_as(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        cookie_pair(&response.set_cookie.expect("login sets a cookie"))
    }

    pub async fn login(&self) -> String {
        self.login_as(USERNAME, PASSWORD).await
    }
}

/// `name=value` part of a `Set-Cookie` header.
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap_or_default().to_string()
}
