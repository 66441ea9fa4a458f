//! Yearly report routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use tally_core::summary::{SummaryService, YearlySummary};
use tally_db::MonthlyRepository;
use tally_shared::Year;

use crate::{AppState, error::ApiError};

/// Creates the yearly report router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/yearly", get(list_years))
        .route("/yearly/{year}", get(get_year))
}

/// GET /yearly - Years with data, most recent first.
async fn list_years(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let repo = MonthlyRepository::new((*state.db).clone());
    Ok(Json(repo.list_years().await?))
}

/// GET /yearly/{year} - Aggregate report; an empty year is an empty report.
async fn get_year(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> Result<Json<YearlySummary>, ApiError> {
    let year: Year = year.parse()?;
    let repo = MonthlyRepository::new((*state.db).clone());

    let months = repo.load_year(&year).await?;
    Ok(Json(SummaryService::yearly(year, months)?))
}
