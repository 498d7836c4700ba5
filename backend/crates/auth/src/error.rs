//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password (never says which)
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email has already been taken")]
    EmailTaken,

    /// Protected action without a session
    #[error("You need to sign in before continuing")]
    Unauthenticated,

    #[error("Session not found or expired")]
    SessionInvalid,

    #[error("Session fingerprint mismatch")]
    SessionFingerprintMismatch,

    /// OAuth callback whose `state` does not match the cookie
    #[error("OAuth state mismatch")]
    OauthStateMismatch,

    #[error("Unknown identity provider: {0}")]
    UnknownProvider(String),

    /// The identity provider failed or returned something unusable
    #[error("Identity provider error: {0}")]
    Provider(String),

    /// Validation and other errors already expressed as `AppError`
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials
            | AuthError::Unauthenticated
            | AuthError::SessionInvalid
            | AuthError::SessionFingerprintMismatch
            | AuthError::OauthStateMismatch => ErrorKind::Unauthorized,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::UnknownProvider(_) => ErrorKind::NotFound,
            AuthError::Provider(_) => ErrorKind::BadGateway,
            AuthError::App(e) => e.kind(),
            AuthError::Database(e) if is_unique_violation(e) => ErrorKind::Conflict,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Provider(msg) => {
                tracing::error!(message = %msg, "Identity provider error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::SessionFingerprintMismatch => {
                tracing::warn!("Session fingerprint mismatch detected");
            }
            AuthError::OauthStateMismatch => {
                tracing::warn!("OAuth callback with mismatched state");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23505")
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::App(e) => e,
            AuthError::Database(e) => AppError::from(e),
            // Never leak internal details to clients
            AuthError::Internal(_) => AppError::internal("Internal server error"),
            AuthError::Provider(_) => AppError::bad_gateway("Identity provider unavailable"),
            AuthError::Unauthenticated => {
                let message = err.to_string();
                AppError::unauthorized(message).with_action("Sign in or sign up")
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
