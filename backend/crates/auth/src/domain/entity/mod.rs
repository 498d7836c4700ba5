//! Entity Module

pub mod auth_assertion;
pub mod auth_session;
pub mod authorization;
pub mod credentials;
pub mod user;

pub use auth_assertion::AuthAssertion;
pub use auth_session::AuthSession;
pub use authorization::Authorization;
pub use credentials::Credentials;
pub use user::{NewAccount, User};
