//! Auth Middleware
//!
//! Resolves the session cookie into a `CurrentUser` request extension.
//! Requests without a valid session pass through anonymously; handlers
//! that need a user reject them through the `CurrentUser` extractor. A
//! session store that cannot answer fails the request with a 5xx instead.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::AuthSessionRepository;
use crate::presentation::extract::{ClientContext, CurrentUser};

/// Middleware state
pub struct AuthMiddlewareState<R>
where
    R: AuthSessionRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthMiddlewareState<R>
where
    R: AuthSessionRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }
}

impl<R> Clone for AuthMiddlewareState<R>
where
    R: AuthSessionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// Attach `CurrentUser` when the request carries a live session
pub async fn authenticate<R>(
    State(state): State<AuthMiddlewareState<R>>,
    ClientContext(fingerprint): ClientContext,
    mut req: Request,
    next: Next,
) -> Response
where
    R: AuthSessionRepository + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);

    if let Some(token) = token {
        let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());
        match use_case.execute(&token, &fingerprint.hash).await {
            Ok(session) => {
                req.extensions_mut().insert(CurrentUser {
                    user_id: session.user_id,
                    public_id: session.public_id,
                });
            }
            Err(e) if e.kind().is_server_error() => return e.into_response(),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring session cookie");
            }
        }
    }

    next.run(req).await
}
