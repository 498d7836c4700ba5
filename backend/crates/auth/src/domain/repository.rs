//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer.

use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession, authorization::Authorization, credentials::Credentials,
    user::{NewAccount, User},
};
use crate::domain::value_object::{
    email::Email,
    provider::{ExternalUid, ProviderName},
};
use crate::error::AuthResult;

#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert the user, its credentials and optional authorization in one
    /// transaction. A taken email surfaces as `AuthError::EmailTaken`.
    async fn create(&self, account: &NewAccount) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;
}

#[trait_variant::make(CredentialsRepository: Send)]
pub trait LocalCredentialsRepository {
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credentials>>;
}

#[trait_variant::make(AuthorizationRepository: Send)]
pub trait LocalAuthorizationRepository {
    /// Look up the authorization for an external identity
    async fn find_by_identity(
        &self,
        provider: &ProviderName,
        uid: &ExternalUid,
    ) -> AuthResult<Option<Authorization>>;

    /// Link an identity to an existing user
    async fn create(&self, authorization: &Authorization) -> AuthResult<()>;

    async fn list_by_user(&self, user_id: &UserId) -> AuthResult<Vec<Authorization>>;
}

#[trait_variant::make(AuthSessionRepository: Send)]
pub trait LocalAuthSessionRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    /// Find an unexpired session; a fingerprint mismatch is an error
    async fn find_by_id(
        &self,
        session_id: Uuid,
        fingerprint_hash: &[u8],
    ) -> AuthResult<Option<AuthSession>>;

    /// Persist last activity and expiry
    async fn update(&self, session: &AuthSession) -> AuthResult<()>;

    async fn delete(&self, session_id: Uuid) -> AuthResult<()>;

    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Everything the auth HTTP layer needs from one store
pub trait AuthStore:
    UserRepository
    + CredentialsRepository
    + AuthorizationRepository
    + AuthSessionRepository
    + Send
    + Sync
    + 'static
{
}

impl<T> AuthStore for T where
    T: UserRepository
        + CredentialsRepository
        + AuthorizationRepository
        + AuthSessionRepository
        + Send
        + Sync
        + 'static
{
}
