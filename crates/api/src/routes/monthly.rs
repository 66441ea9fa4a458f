//! Monthly ledger routes: months, income sources and expense categories.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tally_db::{
    ExpenseRepository, IncomeRepository, MonthlyRepository,
    entities::{expense_categories, income_sources, monthly_data},
    repositories::{
        CreateExpenseInput, CreateIncomeInput, MonthWithItems, UpdateExpenseInput,
        UpdateIncomeInput,
    },
};
use tally_shared::{Amount, MonthKey, types::money::deserialize_patch};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extractors::{IdPath, JsonBody, optional_name, required_name},
};

/// Creates the monthly ledger router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/monthly", get(list_months))
        .route("/monthly/{month}", get(get_month).delete(delete_month))
        .route("/monthly/{month}/income", post(create_income))
        .route(
            "/monthly/income/{id}",
            patch(update_income).delete(delete_income),
        )
        .route("/monthly/{month}/expense", post(create_expense))
        .route(
            "/monthly/expense/{id}",
            patch(update_expense).delete(delete_expense),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Entry of the month list.
#[derive(Debug, Serialize)]
pub struct MonthListItem {
    /// Month ID.
    pub id: Uuid,
    /// Month key.
    pub month: String,
}

/// A month with its rows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthResponse {
    /// Month ID.
    pub id: Uuid,
    /// Month key.
    pub month: String,
    /// Income sources in display order.
    pub income_sources: Vec<IncomeResponse>,
    /// Expense categories in display order.
    pub expense_categories: Vec<ExpenseResponse>,
}

/// An income source.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeResponse {
    /// Income source ID.
    pub id: Uuid,
    /// Owning month ID.
    pub monthly_data_id: Uuid,
    /// Name.
    pub name: String,
    /// Expected amount.
    pub expected_amount: Amount,
    /// Received amount.
    pub actual_amount: Amount,
    /// Display order.
    pub position: i32,
}

/// An expense category.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    /// Expense category ID.
    pub id: Uuid,
    /// Owning month ID.
    pub monthly_data_id: Uuid,
    /// Name.
    pub name: String,
    /// Budgeted amount.
    pub budgeted_amount: Amount,
    /// Spent amount.
    pub actual_amount: Amount,
    /// Paid flag.
    pub is_paid: bool,
    /// Whether the paid toggle is shown.
    pub show_paid_status: bool,
    /// Display order.
    pub position: i32,
}

/// Request body for creating an income source.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncomeRequest {
    /// Name (required).
    pub name: Option<String>,
    /// Expected amount, 0 when absent.
    #[serde(default)]
    pub expected_amount: Amount,
    /// Received amount, 0 when absent.
    #[serde(default)]
    pub actual_amount: Amount,
}

/// Request body for updating an income source.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncomeRequest {
    /// New name.
    pub name: Option<String>,
    /// New expected amount.
    #[serde(default, deserialize_with = "deserialize_patch")]
    pub expected_amount: Option<Amount>,
    /// New received amount.
    #[serde(default, deserialize_with = "deserialize_patch")]
    pub actual_amount: Option<Amount>,
}

/// Request body for creating an expense category.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    /// Name (required).
    pub name: Option<String>,
    /// Budgeted amount, 0 when absent.
    #[serde(default)]
    pub budgeted_amount: Amount,
    /// Spent amount, 0 when absent.
    #[serde(default)]
    pub actual_amount: Amount,
    /// Paid flag, false when absent.
    #[serde(default)]
    pub is_paid: bool,
    /// Paid toggle visibility, false when absent.
    #[serde(default)]
    pub show_paid_status: bool,
}

/// Request body for updating an expense category.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    /// New name.
    pub name: Option<String>,
    /// New budget.
    #[serde(default, deserialize_with = "deserialize_patch")]
    pub budgeted_amount: Option<Amount>,
    /// New spent amount.
    #[serde(default, deserialize_with = "deserialize_patch")]
    pub actual_amount: Option<Amount>,
    /// New paid flag.
    pub is_paid: Option<bool>,
    /// New paid toggle visibility.
    pub show_paid_status: Option<bool>,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_month(raw: &str) -> Result<MonthKey, ApiError> {
    Ok(raw.parse::<MonthKey>()?)
}

fn in_range(amount: Option<Amount>, field: &str) -> Result<Option<Amount>, ApiError> {
    Ok(amount
        .map(|a| a.require_in_range(field))
        .transpose()?)
}

impl From<&income_sources::Model> for IncomeResponse {
    fn from(m: &income_sources::Model) -> Self {
        Self {
            id: m.id,
            monthly_data_id: m.monthly_data_id,
            name: m.name.clone(),
            expected_amount: Amount::new(m.expected_amount),
            actual_amount: Amount::new(m.actual_amount),
            position: m.position,
        }
    }
}

impl From<&expense_categories::Model> for ExpenseResponse {
    fn from(m: &expense_categories::Model) -> Self {
        Self {
            id: m.id,
            monthly_data_id: m.monthly_data_id,
            name: m.name.clone(),
            budgeted_amount: Amount::new(m.budgeted_amount),
            actual_amount: Amount::new(m.actual_amount),
            is_paid: m.is_paid,
            show_paid_status: m.show_paid_status,
            position: m.position,
        }
    }
}

impl From<MonthWithItems> for MonthResponse {
    fn from(m: MonthWithItems) -> Self {
        Self {
            id: m.month.id,
            month: m.month.month,
            income_sources: m.incomes.iter().map(IncomeResponse::from).collect(),
            expense_categories: m.expenses.iter().map(ExpenseResponse::from).collect(),
        }
    }
}

impl From<monthly_data::Model> for MonthListItem {
    fn from(m: monthly_data::Model) -> Self {
        Self {
            id: m.id,
            month: m.month,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /monthly - List months, most recent first.
async fn list_months(State(state): State<AppState>) -> Result<Json<Vec<MonthListItem>>, ApiError> {
    let repo = MonthlyRepository::new((*state.db).clone());
    let months = repo.list().await?;
    Ok(Json(months.into_iter().map(MonthListItem::from).collect()))
}

/// GET /monthly/{month} - Read a month, creating it on first access.
async fn get_month(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<Json<MonthResponse>, ApiError> {
    let key = parse_month(&month)?;
    let repo = MonthlyRepository::new((*state.db).clone());

    let ledger = repo
        .get_or_create(&key, state.config.ledger.month_conflict_policy)
        .await?;

    Ok(Json(ledger.into()))
}

/// DELETE /monthly/{month} - Delete a month with all its rows.
async fn delete_month(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let key = parse_month(&month)?;
    let repo = MonthlyRepository::new((*state.db).clone());

    repo.delete(&key).await?;

    Ok(Json(json!({ "success": true })))
}

/// POST /monthly/{month}/income - Add an income source to an existing month.
async fn create_income(
    State(state): State<AppState>,
    Path(month): Path<String>,
    JsonBody(payload): JsonBody<CreateIncomeRequest>,
) -> Result<(StatusCode, Json<IncomeResponse>), ApiError> {
    let key = parse_month(&month)?;
    let input = CreateIncomeInput {
        name: required_name(payload.name)?,
        expected_amount: payload.expected_amount.require_in_range("expectedAmount")?,
        actual_amount: payload.actual_amount.require_in_range("actualAmount")?,
    };

    let repo = IncomeRepository::new((*state.db).clone());
    let income = repo.create(&key, input).await?;

    info!(month = %key, income_id = %income.id, "Income source created");
    Ok((StatusCode::CREATED, Json(IncomeResponse::from(&income))))
}

/// PATCH /monthly/income/{id} - Update an income source.
async fn update_income(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<UpdateIncomeRequest>,
) -> Result<Json<IncomeResponse>, ApiError> {
    let input = UpdateIncomeInput {
        name: optional_name(payload.name)?,
        expected_amount: in_range(payload.expected_amount, "expectedAmount")?,
        actual_amount: in_range(payload.actual_amount, "actualAmount")?,
    };

    let repo = IncomeRepository::new((*state.db).clone());
    let income = repo.update(id, input).await?;

    Ok(Json(IncomeResponse::from(&income)))
}

/// DELETE /monthly/income/{id} - Delete an income source.
async fn delete_income(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<Value>, ApiError> {
    let repo = IncomeRepository::new((*state.db).clone());
    repo.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /monthly/{month}/expense - Add an expense category to an existing month.
async fn create_expense(
    State(state): State<AppState>,
    Path(month): Path<String>,
    JsonBody(payload): JsonBody<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseResponse>), ApiError> {
    let key = parse_month(&month)?;
    let input = CreateExpenseInput {
        name: required_name(payload.name)?,
        budgeted_amount: payload.budgeted_amount.require_in_range("budgetedAmount")?,
        actual_amount: payload.actual_amount.require_in_range("actualAmount")?,
        is_paid: payload.is_paid,
        show_paid_status: payload.show_paid_status,
    };

    let repo = ExpenseRepository::new((*state.db).clone());
    let expense = repo.create(&key, input).await?;

    info!(month = %key, expense_id = %expense.id, "Expense category created");
    Ok((StatusCode::CREATED, Json(ExpenseResponse::from(&expense))))
}

/// PATCH /monthly/expense/{id} - Update an expense category.
async fn update_expense(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<UpdateExpenseRequest>,
) -> Result<Json<ExpenseResponse>, ApiError> {
    let input = UpdateExpenseInput {
        name: optional_name(payload.name)?,
        budgeted_amount: in_range(payload.budgeted_amount, "budgetedAmount")?,
        actual_amount: in_range(payload.actual_amount, "actualAmount")?,
        is_paid: payload.is_paid,
        show_paid_status: payload.show_paid_status,
    };

    let repo = ExpenseRepository::new((*state.db).clone());
    let expense = repo.update(id, input).await?;

    Ok(Json(ExpenseResponse::from(&expense)))
}

/// DELETE /monthly/expense/{id} - Delete an expense category.
async fn delete_expense(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<Value>, ApiError> {
    let repo = ExpenseRepository::new((*state.db).clone());
    repo.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
