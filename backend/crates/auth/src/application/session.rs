//! Resolving and ending the session behind a cookie token

use std::sync::Arc;

use chrono::Duration;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::AuthSessionRepository;
use crate::error::{AuthError, AuthResult};

pub struct CheckSessionUseCase<S: AuthSessionRepository> {
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S: AuthSessionRepository> CheckSessionUseCase<S> {
    pub fn new(sessions: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { sessions, config }
    }

    /// The live session for `token`, seen from the client with `fingerprint_hash`
    ///
    /// Expired sessions are removed on sight. Remember-me sessions slide
    /// forward once past half of their lifetime.
    pub async fn execute(&self, token: &str, fingerprint_hash: &[u8]) -> AuthResult<AuthSession> {
        let session_id = session_token::verify(&self.config.session_secret, token)?;

        let Some(mut session) = self.sessions.find_by_id(session_id, fingerprint_hash).await? else {
            return Err(AuthError::SessionInvalid);
        };
        if session.is_expired() {
            self.sessions.delete(session_id).await?;
            return Err(AuthError::SessionInvalid);
        }

        let sliding = Duration::from_std(self.config.session_ttl_long)
            .map_err(|e| AuthError::Internal(format!("session_ttl_long out of range: {e}")))?;
        session.touch();
        session.extend_if_needed(sliding);

        // Activity tracking is best effort
        if let Err(e) = self.sessions.update(&session).await {
            tracing::warn!(%session_id, error = %e, "Could not record session activity");
        }

        Ok(session)
    }
}

pub struct SignOutUseCase<S: AuthSessionRepository> {
    sessions: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S: AuthSessionRepository> SignOutUseCase<S> {
    pub fn new(sessions: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { sessions, config }
    }

    /// Forget the session server side; a forged token is rejected
    pub async fn execute(&self, token: &str) -> AuthResult<()> {
        let session_id = session_token::verify(&self.config.session_secret, token)?;
        self.sessions.delete(session_id).await?;

        tracing::info!(%session_id, "Signed out");
        Ok(())
    }
}
