//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api`
//! - Session authentication middleware and the `AuthUser` extractor
//! - Session stores and cookie helpers
//! - Error rendering
//! - Static serving of the single-page front end

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod session;

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
};
use sea_orm::DatabaseConnection;
use tally_shared::AppConfig;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::session::SessionStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Session storage backend.
    pub sessions: Arc<dyn SessionStore>,
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new().nest("/api", routes::api_routes_with_state(state.clone()));

    if let Some(dir) = &state.config.server.static_dir {
        let index = Path::new(dir).join("index.html");
        router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    if let Some(cors) = state.config.server.cors_origin.as_deref().and_then(cors_layer) {
        router = router.layer(cors);
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// CORS for a single origin that sends the session cookie.
fn cors_layer(origin: &str) -> Option<CorsLayer> {
    let Ok(origin) = origin.parse::<HeaderValue>() else {
        warn!(origin, "Ignoring invalid CORS origin");
        return None;
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers([CONTENT_TYPE]),
    )
}
