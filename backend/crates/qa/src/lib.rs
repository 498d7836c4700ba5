//! Q&A Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL repository
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Questions and answers with nested links
//! - Up/down votes on questions and answers, one per user and resource
//! - A best answer per question, earning the question's reward
//! - Question subscriptions
//!
//! Identity comes from `auth::CurrentUser`; only authors may change or
//! delete what they wrote.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::config::QaConfig;
pub use domain::repository::QaStore;
pub use error::{QaError, QaResult};
pub use infra::postgres::PgQaRepository;
pub use presentation::router::qa_router;
