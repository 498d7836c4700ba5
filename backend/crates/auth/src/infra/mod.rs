//! Infrastructure Layer
//!
//! Database implementations and external identity providers.

pub mod github;
pub mod postgres;

pub use github::{GithubConfig, GithubProvider};
pub use postgres::PgAuthRepository;
