//! OAuth Sign In Use Case
//!
//! Completes the provider callback: checks `state`, asks the provider who
//! the user is, reconciles that identity with local accounts and opens a
//! session.

use std::sync::Arc;

use platform::client::ClientFingerprint;
use platform::crypto::constant_time_eq;

use crate::application::config::AuthConfig;
use crate::application::reconcile_identity::{ReconcileIdentityUseCase, ReconcileOutcome};
use crate::application::session_token::{self, IssuedSession};
use crate::domain::entity::user::User;
use crate::domain::identity_provider::IdentityProvider;
use crate::domain::repository::{AuthSessionRepository, AuthorizationRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

pub struct OauthCallbackInput {
    pub code: String,
    /// `state` query parameter
    pub state: String,
    /// `state` remembered in the cookie when the flow started
    pub expected_state: Option<String>,
}

pub struct OauthSignInOutput {
    pub user: User,
    pub outcome: ReconcileOutcome,
    pub issued: IssuedSession,
}

pub struct OauthSignInUseCase<R, P>
where
    R: UserRepository + AuthorizationRepository + AuthSessionRepository,
    P: IdentityProvider,
{
    repo: Arc<R>,
    provider: Arc<P>,
    config: Arc<AuthConfig>,
}

impl<R, P> OauthSignInUseCase<R, P>
where
    R: UserRepository + AuthorizationRepository + AuthSessionRepository,
    P: IdentityProvider,
{
    pub fn new(repo: Arc<R>, provider: Arc<P>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            provider,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: OauthCallbackInput,
        fingerprint: ClientFingerprint,
    ) -> AuthResult<OauthSignInOutput> {
        let expected = input
            .expected_state
            .ok_or(AuthError::OauthStateMismatch)?;
        if input.state.is_empty() || !constant_time_eq(expected.as_bytes(), input.state.as_bytes())
        {
            return Err(AuthError::OauthStateMismatch);
        }

        let assertion = self.provider.fetch_assertion(&input.code).await?;
        if assertion.provider != *self.provider.name() {
            return Err(AuthError::Provider(format!(
                "{} returned an assertion for {}",
                self.provider.name(),
                assertion.provider
            )));
        }

        let reconciled =
            ReconcileIdentityUseCase::new(self.repo.clone(), self.repo.clone(), self.config.clone())
                .execute(&assertion)
                .await?;

        // OAuth sessions always use the long TTL
        let issued = session_token::issue(
            self.repo.as_ref(),
            &self.config,
            &reconciled.user,
            true,
            &fingerprint,
        )
        .await?;

        Ok(OauthSignInOutput {
            user: reconciled.user,
            outcome: reconciled.outcome,
            issued,
        })
    }
}
