//! Reconcile Identity Use Case
//!
//! Turns an external `AuthAssertion` into exactly one local user:
//!
//! 1. An authorization for (provider, uid) exists: return its user.
//! 2. Otherwise, a user with the assertion's email exists: link a new
//!    authorization to that user.
//! 3. Otherwise: create a user with a random password together with the
//!    authorization.
//!
//! Without a usable email step 2 is skipped and a new account is always
//! created under a placeholder address. Two provider accounts of the same
//! person therefore end up as two local users.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{
    auth_assertion::AuthAssertion,
    authorization::Authorization,
    credentials::Credentials,
    user::{NewAccount, User},
};
use crate::domain::repository::{AuthorizationRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Which branch produced the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    ExistingAuthorization,
    LinkedByEmail,
    CreatedUser,
}

#[derive(Debug)]
pub struct ReconcileOutput {
    pub user: User,
    pub outcome: ReconcileOutcome,
}

pub struct ReconcileIdentityUseCase<U, A>
where
    U: UserRepository,
    A: AuthorizationRepository,
{
    user_repo: Arc<U>,
    authorization_repo: Arc<A>,
    config: Arc<AuthConfig>,
}

impl<U, A> ReconcileIdentityUseCase<U, A>
where
    U: UserRepository,
    A: AuthorizationRepository,
{
    pub fn new(user_repo: Arc<U>, authorization_repo: Arc<A>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            authorization_repo,
            config,
        }
    }

    pub async fn execute(&self, assertion: &AuthAssertion) -> AuthResult<ReconcileOutput> {
        if let Some(authorization) = self
            .authorization_repo
            .find_by_identity(&assertion.provider, &assertion.uid)
            .await?
        {
            let user = self
                .user_repo
                .find_by_id(&authorization.user_id)
                .await?
                .ok_or_else(|| {
                    AuthError::Internal(format!(
                        "Authorization {} points at a missing user",
                        authorization.authorization_id
                    ))
                })?;

            tracing::debug!(
                provider = %assertion.provider,
                public_id = %user.public_id,
                "External identity already linked"
            );
            return Ok(ReconcileOutput {
                user,
                outcome: ReconcileOutcome::ExistingAuthorization,
            });
        }

        let email = match assertion.usable_email() {
            Some(raw) => Some(Email::new(raw)?),
            None => None,
        };

        if let Some(email) = &email
            && let Some(user) = self.user_repo.find_by_email(email).await?
        {
            let authorization = Authorization::new(
                user.user_id,
                assertion.provider.clone(),
                assertion.uid.clone(),
            );
            self.authorization_repo.create(&authorization).await?;

            tracing::info!(
                provider = %assertion.provider,
                public_id = %user.public_id,
                "External identity linked to existing user by email"
            );
            return Ok(ReconcileOutput {
                user,
                outcome: ReconcileOutcome::LinkedByEmail,
            });
        }

        let email = match email {
            Some(email) => email,
            None => Email::placeholder(assertion.provider.as_str(), assertion.uid.as_str())?,
        };

        let user = User::new(email);
        let password_hash = UserPassword::from_raw(&RawPassword::generate(), self.config.pepper())?;
        let account = NewAccount {
            credentials: Credentials::new(user.user_id, password_hash),
            authorization: Some(Authorization::new(
                user.user_id,
                assertion.provider.clone(),
                assertion.uid.clone(),
            )),
            user,
        };
        self.user_repo.create(&account).await?;

        tracing::info!(
            provider = %assertion.provider,
            public_id = %account.user.public_id,
            placeholder_email = account.user.email.is_placeholder(),
            "User created from external identity"
        );

        Ok(ReconcileOutput {
            user: account.user,
            outcome: ReconcileOutcome::CreatedUser,
        })
    }
}
