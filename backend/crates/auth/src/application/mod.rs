//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod list_authorizations;
pub mod oauth_sign_in;
pub mod reconcile_identity;
pub mod session;
pub mod session_token;
pub mod sign_in;
pub mod sign_up;

// Re-exports
pub use config::AuthConfig;
pub use list_authorizations::ListAuthorizationsUseCase;
pub use oauth_sign_in::{OauthCallbackInput, OauthSignInOutput, OauthSignInUseCase};
pub use reconcile_identity::{ReconcileIdentityUseCase, ReconcileOutcome, ReconcileOutput};
pub use session::{CheckSessionUseCase, SignOutUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
