//! Domain Layer
//!
//! Entities, value objects, repository traits and the identity provider
//! port.

pub mod entity;
pub mod identity_provider;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{AuthAssertion, AuthSession, Authorization, Credentials, NewAccount, User};
pub use identity_provider::IdentityProvider;
pub use repository::{
    AuthSessionRepository, AuthStore, AuthorizationRepository, CredentialsRepository,
    UserRepository,
};
