//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::{authorization::Authorization, user::User};

// ============================================================================
// Sign Up / Sign In
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Body of successful sign up / sign in
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub public_id: String,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            public_id: user.public_id.to_string(),
            email: user.email.as_str().to_string(),
        }
    }
}

// ============================================================================
// Session Status
// ============================================================================

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at_ms: Option<i64>,
}

// ============================================================================
// OAuth
// ============================================================================

/// Query string of the provider callback
#[derive(Debug, Clone, Deserialize)]
pub struct OauthCallbackQuery {
    pub code: Option<String>,
    #[serde(default)]
    pub state: String,
    /// Set by the provider when the user declined
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationResponse {
    pub provider: String,
    pub uid: String,
    pub created_at: i64,
}

impl From<&Authorization> for AuthorizationResponse {
    fn from(authorization: &Authorization) -> Self {
        Self {
            provider: authorization.provider.to_string(),
            uid: authorization.uid.to_string(),
            created_at: authorization.created_at.timestamp_millis(),
        }
    }
}
