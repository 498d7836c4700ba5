//! Sign Up Use Case
//!
//! Creates a password account and signs it in.

use std::sync::Arc;

use kernel::error::field::FieldErrors;
use platform::client::ClientFingerprint;

use crate::application::config::AuthConfig;
use crate::application::session_token::{self, IssuedSession};
use crate::domain::entity::{
    credentials::Credentials,
    user::{NewAccount, User},
};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub remember_me: bool,
}

#[derive(Debug)]
pub struct SignUpOutput {
    pub user: User,
    pub issued: IssuedSession,
}

pub struct SignUpUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> SignUpUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: SignUpInput,
        fingerprint: ClientFingerprint,
    ) -> AuthResult<SignUpOutput> {
        let mut errors = FieldErrors::new();

        let email = Email::parse(input.email)
            .map_err(|message| errors.push("email", message))
            .ok();

        if input.password != input.password_confirmation {
            errors.push("passwordConfirmation", "doesn't match password");
        }
        let password = RawPassword::new(input.password)
            .map_err(|e| errors.extend(e.field_errors().iter().cloned()))
            .ok();

        errors.into_result()?;
        let (Some(email), Some(password)) = (email, password) else {
            return Err(AuthError::Internal("Validated sign-up input missing".into()));
        };

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let user = User::new(email);
        let password_hash = UserPassword::from_raw(&password, self.config.pepper())?;
        let account = NewAccount {
            credentials: Credentials::new(user.user_id, password_hash),
            authorization: None,
            user,
        };
        self.user_repo.create(&account).await?;

        tracing::info!(public_id = %account.user.public_id, "User signed up");

        let issued = session_token::issue(
            self.session_repo.as_ref(),
            &self.config,
            &account.user,
            input.remember_me,
            &fingerprint,
        )
        .await?;

        Ok(SignUpOutput {
            user: account.user,
            issued,
        })
    }
}
