//! Authentication routes: login, logout, session lookup and credential change.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Duration;
use serde_json::{Value, json};
use tally_core::auth::{CredentialChange, HashCost, hash_password, verify_absent, verify_password};
use tally_db::{UserRepository, repositories::UpdateCredentialsInput};
use tally_shared::{
    AppError, SessionUser,
    auth::{AuthResponse, ChangeCredentialsRequest, LoginRequest, MeResponse},
};
use tracing::info;

use crate::{
    AppState,
    error::ApiError,
    extractors::JsonBody,
    middleware::auth::AuthUser,
    session::{removal_cookie, session_cookie, session_token},
};

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

/// Auth routes that need a session.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/change-credentials", post(change_credentials))
}

/// POST /auth/login - Verify credentials and start a session.
///
/// Unknown usernames and wrong passwords get the same 401 answer and cost
/// one password verification each.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let user_repo = UserRepository::new((*state.db).clone());

    let Some(user) = user_repo.find_by_username(&payload.username).await? else {
        verify_absent(&payload.password, HashCost::from(&state.config.auth))?;
        info!(username = %payload.username, "Login attempt for non-existent user");
        return Err(ApiError::invalid_credentials());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(ApiError::invalid_credentials());
    }

    let ttl = Duration::days(state.config.session.ttl_days);
    let token = state
        .sessions
        .create(SessionUser::new(user.id, user.username.clone()), ttl)
        .await?;

    info!(user_id = %user.id, "User logged in successfully");

    let jar = jar.add(session_cookie(&state.config.session, token));
    Ok((jar, Json(AuthResponse::ok(user.username))))
}

/// POST /auth/logout - End the session, if any, and clear the cookie.
async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    if let Some(token) = session_token(&jar, &state.config.session) {
        state.sessions.destroy(&token).await?;
        info!("User logged out");
    }

    let jar = jar.add(removal_cookie(&state.config.session));
    Ok((jar, Json(json!({ "success": true }))))
}

/// GET /auth/me - Report whether the request carries a live session.
async fn me(State(state): State<AppState>, jar: CookieJar) -> Result<Json<MeResponse>, ApiError> {
    let user = match session_token(&jar, &state.config.session) {
        Some(token) => state.sessions.load(&token).await?,
        None => None,
    };

    Ok(Json(MeResponse {
        authenticated: user.is_some(),
        username: user.map(|u| u.username),
    }))
}

/// POST /auth/change-credentials - Change username and/or password.
async fn change_credentials(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(payload): JsonBody<ChangeCredentialsRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = user_repo
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(ApiError::unauthorized)?;

    if !verify_password(&payload.current_password, &user.password_hash)? {
        info!(user_id = %user.id, "Credential change with wrong current password");
        return Err(AppError::Unauthorized("Current password is incorrect".to_string()).into());
    }

    let change = CredentialChange::plan(
        &user.username,
        payload.new_username.as_deref(),
        payload.new_password.as_deref(),
    )?;

    if change.is_noop() {
        return Ok(Json(AuthResponse::ok(user.username)));
    }

    if let Some(username) = &change.username
        && user_repo.username_taken(username, user.id).await?
    {
        return Err(AppError::Conflict("Username already taken".to_string()).into());
    }

    let password_hash = change
        .password
        .as_deref()
        .map(|password| hash_password(password, HashCost::from(&state.config.auth)))
        .transpose()?;

    let updated = user_repo
        .update_credentials(
            user.id,
            UpdateCredentialsInput {
                username: change.username,
                password_hash,
            },
        )
        .await?;

    state
        .sessions
        .rename_user(updated.id, &updated.username)
        .await?;

    info!(user_id = %updated.id, "Credentials updated");
    Ok(Json(AuthResponse::ok(updated.username)))
}
