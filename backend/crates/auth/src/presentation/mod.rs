//! Presentation Layer
//!
//! HTTP handlers, DTOs, extractors, router, and middleware.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use extract::{ClientContext, CurrentUser};
pub use handlers::AuthAppState;
pub use middleware::{AuthMiddlewareState, authenticate};
pub use router::auth_router;
