//! Request extractors that answer malformed input with JSON errors.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tally_shared::AppError;
use uuid::Uuid;

use crate::error::ApiError;

/// JSON body whose rejections render as 400 `validation_error`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text()).into()),
        }
    }
}

/// A UUID path segment; malformed ids answer 400.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Uuid);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        Uuid::parse_str(&raw)
            .map(Self)
            .map_err(|_| AppError::Validation(format!("Invalid id: {raw}")).into())
    }
}

/// Returns a trimmed, non-empty name or a validation error.
pub fn required_name(name: Option<String>) -> Result<String, ApiError> {
    match name.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(AppError::Validation("name is required".to_string()).into()),
    }
}

/// Trims an optional name, rejecting a blank replacement.
pub fn optional_name(name: Option<String>) -> Result<Option<String>, ApiError> {
    name.map(|n| required_name(Some(n))).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_name() {
        assert_eq!(required_name(Some("  Rent ".into())).unwrap(), "Rent");
        assert!(required_name(Some("   ".into())).is_err());
        assert!(required_name(None).is_err());
    }

    #[test]
    fn test_optional_name() {
        assert_eq!(optional_name(None).unwrap(), None);
        assert_eq!(optional_name(Some("Gym".into())).unwrap().as_deref(), Some("Gym"));
        assert!(optional_name(Some(String::new())).is_err());
    }
}
