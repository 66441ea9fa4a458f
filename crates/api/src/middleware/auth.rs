//! Session authentication for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tally_shared::SessionUser;
use tracing::debug;

use crate::{AppState, error::ApiError, session::session_token};

/// Authentication middleware that resolves the session cookie.
///
/// This middleware:
/// 1. Reads the session token from the cookie
/// 2. Loads the session from the configured store
/// 3. Stores the user in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let Some(token) = session_token(&jar, &state.config.session) else {
        return ApiError::unauthorized().into_response();
    };

    match state.sessions.load(&token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => {
            debug!("Rejected request with unknown or expired session");
            ApiError::unauthorized().into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Extractor for the authenticated user.
///
/// Use this in handlers behind [`auth_middleware`]:
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let user_id = auth.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionUser);

impl AuthUser {
    /// Returns the user ID.
    #[must_use]
    pub const fn user_id(&self) -> uuid::Uuid {
        self.0.user_id
    }

    /// Returns the username as of session load.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.0.username
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(ApiError::unauthorized)
    }
}
