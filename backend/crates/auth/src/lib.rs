//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and provider traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL repository and the GitHub identity provider
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Sign up / sign in with email + password
//! - Sign in through an external OAuth provider (GitHub), reconciled against
//!   existing accounts by (provider, uid) and then by email
//! - Server-side sessions referenced by an HMAC-signed cookie
//! - `CurrentUser` extractor for the other domain crates
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B policy)
//! - Sessions bound to a client fingerprint (User-Agent)
//! - OAuth `state` round-trips through an HttpOnly cookie and is compared in
//!   constant time

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::github::{GithubConfig, GithubProvider};
pub use infra::postgres::PgAuthRepository;
pub use presentation::extract::CurrentUser;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
