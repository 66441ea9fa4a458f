//! Savings goal routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tally_db::{
    SavingsRepository,
    entities::savings_goals,
    repositories::{CreateSavingsGoalInput, UpdateSavingsGoalInput},
};
use tally_shared::{Amount, types::money::deserialize_patch};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extractors::{IdPath, JsonBody, optional_name, required_name},
};

/// Creates the savings router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/savings", get(list_goals).post(create_goal))
        .route(
            "/savings/{id}",
            get(get_goal).patch(update_goal).delete(delete_goal),
        )
}

/// A savings goal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalResponse {
    /// Goal ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Amount to reach.
    pub target_amount: Amount,
    /// Amount saved so far.
    pub current_amount: Amount,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<savings_goals::Model> for SavingsGoalResponse {
    fn from(m: savings_goals::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            target_amount: Amount::new(m.target_amount),
            current_amount: Amount::new(m.current_amount),
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

/// Request body for creating a goal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSavingsGoalRequest {
    /// Name (required).
    pub name: Option<String>,
    /// Target, 0 when absent.
    #[serde(default)]
    pub target_amount: Amount,
    /// Saved so far, 0 when absent.
    #[serde(default)]
    pub current_amount: Amount,
}

/// Request body for updating a goal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSavingsGoalRequest {
    /// New name.
    pub name: Option<String>,
    /// New target.
    #[serde(default, deserialize_with = "deserialize_patch")]
    pub target_amount: Option<Amount>,
    /// New saved amount.
    #[serde(default, deserialize_with = "deserialize_patch")]
    pub current_amount: Option<Amount>,
}

/// GET /savings - List all goals.
async fn list_goals(
    State(state): State<AppState>,
) -> Result<Json<Vec<SavingsGoalResponse>>, ApiError> {
    let repo = SavingsRepository::new((*state.db).clone());
    let goals = repo.list().await?;
    Ok(Json(goals.into_iter().map(SavingsGoalResponse::from).collect()))
}

/// POST /savings - Create a goal.
async fn create_goal(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateSavingsGoalRequest>,
) -> Result<(StatusCode, Json<SavingsGoalResponse>), ApiError> {
    let input = CreateSavingsGoalInput {
        name: required_name(payload.name)?,
        target_amount: payload.target_amount.require_in_range("targetAmount")?,
        current_amount: payload.current_amount.require_in_range("currentAmount")?,
    };

    let repo = SavingsRepository::new((*state.db).clone());
    let goal = repo.create(input).await?;

    info!(goal_id = %goal.id, "Savings goal created");
    Ok((StatusCode::CREATED, Json(goal.into())))
}

/// GET /savings/{id} - Fetch one goal.
async fn get_goal(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<SavingsGoalResponse>, ApiError> {
    let repo = SavingsRepository::new((*state.db).clone());
    Ok(Json(repo.get(id).await?.into()))
}

/// PATCH /savings/{id} - Update a goal.
async fn update_goal(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<UpdateSavingsGoalRequest>,
) -> Result<Json<SavingsGoalResponse>, ApiError> {
    let input = UpdateSavingsGoalInput {
        name: optional_name(payload.name)?,
        target_amount: payload
            .target_amount
            .map(|a| a.require_in_range("targetAmount"))
            .transpose()?,
        current_amount: payload
            .current_amount
            .map(|a| a.require_in_range("currentAmount"))
            .transpose()?,
    };

    let repo = SavingsRepository::new((*state.db).clone());
    Ok(Json(repo.update(id, input).await?.into()))
}

/// DELETE /savings/{id} - Delete a goal.
async fn delete_goal(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<Value>, ApiError> {
    let repo = SavingsRepository::new((*state.db).clone());
    repo.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
