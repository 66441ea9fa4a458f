//! API route definitions.

use axum::{Router, middleware};
use tally_shared::AppError;

use crate::{AppState, error::ApiError, middleware::auth::auth_middleware};

pub mod auth;
pub mod health;
pub mod monthly;
pub mod savings;
pub mod yearly;

/// Creates the API router with public and session-protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require a session
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(monthly::routes())
        .merge(savings::routes())
        .merge(yearly::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
        .fallback(not_found)
}

/// Unknown `/api` paths answer JSON instead of the front end's index page.
async fn not_found() -> ApiError {
    AppError::NotFound("No such endpoint".to_string()).into()
}
