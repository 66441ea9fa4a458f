//! Mapping of domain errors to HTTP responses.
//!
//! Every error body has the shape `{"error": "<code>", "message": "..."}`.
//! Server-side failures are logged and answered with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tally_core::auth::{CredentialError, PasswordError};
use tally_core::summary::SummaryError;
use tally_db::{LedgerError, SavingsError, UserError};
use tally_shared::AppError;
use tracing::error;

/// An error ready to be rendered as a JSON response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// The single answer for any failed login, whatever the cause.
    #[must_use]
    pub fn invalid_credentials() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "invalid_credentials",
            message: "Invalid credentials".to_string(),
        }
    }

    /// Missing or expired session.
    #[must_use]
    pub fn unauthorized() -> Self {
        AppError::Unauthorized("Authentication required".to_string()).into()
    }

    /// Returns the HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            error!(error = %err, "Request failed");
        }
        Self {
            status: StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code: err.error_code(),
            message: err.public_message(),
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        AppError::Database(err.to_string()).into()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let app = match err {
            LedgerError::MonthNotFound(month) => {
                AppError::NotFound(format!("Month {month} not found"))
            }
            LedgerError::IncomeNotFound(_) => {
                AppError::NotFound("Income source not found".to_string())
            }
            LedgerError::ExpenseNotFound(_) => {
                AppError::NotFound("Expense category not found".to_string())
            }
            LedgerError::MonthExists(month) => AppError::Conflict(format!(
                "Month {month} was just created by another request. Reload and try again"
            )),
            LedgerError::Database(e) => AppError::Database(e.to_string()),
        };
        app.into()
    }
}

impl From<SavingsError> for ApiError {
    fn from(err: SavingsError) -> Self {
        let app = match err {
            SavingsError::NotFound(_) => AppError::NotFound("Savings goal not found".to_string()),
            SavingsError::Database(e) => AppError::Database(e.to_string()),
        };
        app.into()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        let app = match err {
            UserError::NotFound(_) => AppError::Unauthorized("User no longer exists".to_string()),
            UserError::UsernameTaken(_) => AppError::Conflict("Username already taken".to_string()),
            UserError::Database(e) => AppError::Database(e.to_string()),
        };
        app.into()
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        AppError::Validation(err.to_string()).into()
    }
}

impl From<SummaryError> for ApiError {
    fn from(err: SummaryError) -> Self {
        AppError::Internal(err.to_string()).into()
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal(err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_ledger_errors_map_to_status() {
        assert_eq!(
            ApiError::from(LedgerError::MonthNotFound("2025-01".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(LedgerError::IncomeNotFound(Uuid::nil())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(LedgerError::MonthExists("2025-01".into())).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = ApiError::from(DbErr::Custom("disk on fire".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "internal_error");
        assert_eq!(err.message, "An error occurred");
    }

    #[test]
    fn test_credential_errors_are_validation() {
        let err = ApiError::from(CredentialError::NothingToChange);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "validation_error");
    }

    #[test]
    fn test_summary_overflow_is_server_error() {
        let err = ApiError::from(SummaryError::Overflow("2025".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "An error occurred");
    }

    #[test]
    fn test_username_taken_is_conflict() {
        let err = ApiError::from(UserError::UsernameTaken("bob".into()));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
