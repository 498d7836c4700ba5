//! Sign In Use Case
//!
//! Authenticates a user by email + password and creates a session.

use std::sync::Arc;

use platform::client::ClientFingerprint;

use crate::application::config::AuthConfig;
use crate::application::session_token::{self, IssuedSession};
use crate::domain::entity::user::User;
use crate::domain::repository::{AuthSessionRepository, CredentialsRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

pub struct SignInInput {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

#[derive(Debug)]
pub struct SignInOutput {
    pub user: User,
    pub issued: IssuedSession,
}

pub struct SignInUseCase<U, C, S>
where
    U: UserRepository,
    C: CredentialsRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    credentials_repo: Arc<C>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, C, S> SignInUseCase<U, C, S>
where
    U: UserRepository,
    C: CredentialsRepository,
    S: AuthSessionRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        credentials_repo: Arc<C>,
        session_repo: Arc<S>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            credentials_repo,
            session_repo,
            config,
        }
    }

    /// Every failure before the session is created is `InvalidCredentials`
    pub async fn execute(
        &self,
        input: SignInInput,
        fingerprint: ClientFingerprint,
    ) -> AuthResult<SignInOutput> {
        let email = Email::parse(input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let password =
            RawPassword::for_verification(input.password).ok_or(AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let credentials = self
            .credentials_repo
            .find_by_user_id(&user.user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !credentials
            .password_hash
            .verify(&password, self.config.pepper())
        {
            return Err(AuthError::InvalidCredentials);
        }

        let issued = session_token::issue(
            self.session_repo.as_ref(),
            &self.config,
            &user,
            input.remember_me,
            &fingerprint,
        )
        .await?;

        tracing::info!(public_id = %user.public_id, "User signed in");

        Ok(SignInOutput { user, issued })
    }
}
