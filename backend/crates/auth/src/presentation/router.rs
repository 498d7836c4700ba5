//! Auth Router

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::application::config::AuthConfig;
use crate::domain::identity_provider::IdentityProvider;
use crate::domain::repository::AuthStore;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router
///
/// `authorizations` needs `CurrentUser`, so the caller must layer the
/// `authenticate` middleware over this router.
pub fn auth_router<R, P>(repo: Arc<R>, providers: Vec<P>, config: Arc<AuthConfig>) -> Router
where
    R: AuthStore,
    P: IdentityProvider + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo,
        providers: Arc::new(providers.into_iter().map(Arc::new).collect()),
        config,
    };

    Router::new()
        .route("/signup", post(handlers::sign_up::<R, P>))
        .route("/signin", post(handlers::sign_in::<R, P>))
        .route("/signout", post(handlers::sign_out::<R, P>))
        .route("/status", get(handlers::session_status::<R, P>))
        .route("/oauth/{provider}", get(handlers::oauth_start::<R, P>))
        .route(
            "/oauth/{provider}/callback",
            get(handlers::oauth_callback::<R, P>),
        )
        .route(
            "/authorizations",
            get(handlers::list_authorizations::<R, P>),
        )
        .with_state(state)
}
