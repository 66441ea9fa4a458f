//! Authentication types for sessions and credential management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity carried by an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// User ID.
    pub user_id: Uuid,
    /// Username at the time the session was loaded.
    pub username: String,
}

impl SessionUser {
    /// Creates a session identity.
    #[must_use]
    pub fn new(user_id: Uuid, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}

/// A live session as returned by a session store.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// Identity bound to the session.
    pub user: SessionUser,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Returns true once the session is past its expiry.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Response after a successful login or credential change.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Always true.
    pub success: bool,
    /// Current username.
    pub username: String,
}

impl AuthResponse {
    /// Builds a success response for `username`.
    #[must_use]
    pub fn ok(username: impl Into<String>) -> Self {
        Self {
            success: true,
            username: username.into(),
        }
    }
}

/// Response for `GET /auth/me`.
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    /// Whether the request carried a valid session.
    pub authenticated: bool,
    /// Username, when authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Credential change request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeCredentialsRequest {
    /// Proof of the current password.
    pub current_password: String,
    /// New username (optional).
    #[serde(default)]
    pub new_username: Option<String>,
    /// New password (optional).
    #[serde(default)]
    pub new_password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_session_record_expiry() {
        let now = Utc::now();
        let record = SessionRecord {
            user: SessionUser::new(Uuid::new_v4(), "alice"),
            expires_at: now + Duration::days(30),
        };
        assert!(!record.is_expired(now));
        assert!(record.is_expired(now + Duration::days(30)));
    }

    #[test]
    fn test_change_credentials_request_camel_case() {
        let req: ChangeCredentialsRequest = serde_json::from_value(json!({
            "currentPassword": "old-secret",
            "newUsername": "bob"
        }))
        .unwrap();
        assert_eq!(req.current_password, "old-secret");
        assert_eq!(req.new_username.as_deref(), Some("bob"));
        assert!(req.new_password.is_none());
    }

    #[test]
    fn test_me_response_omits_username_when_anonymous() {
        let body = serde_json::to_value(MeResponse {
            authenticated: false,
            username: None,
        })
        .unwrap();
        assert_eq!(body, json!({ "authenticated": false }));
    }
}
