//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse, Redirect};
use kernel::error::app_error::AppError;
use platform::cookie::{CookieConfig, delete_cookie_header, extract_cookie, set_cookie_header};
use platform::crypto::random_token;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, ListAuthorizationsUseCase, OauthCallbackInput, OauthSignInUseCase,
    SignInInput, SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase,
};
use crate::domain::identity_provider::IdentityProvider;
use crate::domain::repository::{AuthStore, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AuthorizationResponse, OauthCallbackQuery, SessionStatusResponse, SignInRequest,
    SignUpRequest, UserResponse,
};
use crate::presentation::extract::{ClientContext, CurrentUser};

const OAUTH_STATE_BYTES: usize = 32;

/// Shared state for auth handlers
pub struct AuthAppState<R, P>
where
    R: AuthStore,
    P: IdentityProvider + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    /// Configured identity providers, looked up by name
    pub providers: Arc<Vec<Arc<P>>>,
    pub config: Arc<AuthConfig>,
}

impl<R, P> Clone for AuthAppState<R, P>
where
    R: AuthStore,
    P: IdentityProvider + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            providers: self.providers.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R, P> AuthAppState<R, P>
where
    R: AuthStore,
    P: IdentityProvider + Send + Sync + 'static,
{
    fn provider(&self, name: &str) -> AuthResult<Arc<P>> {
        self.providers
            .iter()
            .find(|provider| provider.name().as_str() == name)
            .cloned()
            .ok_or_else(|| AuthError::UnknownProvider(name.to_string()))
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R, P>(
    State(state): State<AuthAppState<R, P>>,
    ClientContext(fingerprint): ClientContext,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: IdentityProvider + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let remember_me = req.remember_me;
    let input = SignUpInput {
        email: req.email,
        password: req.password,
        password_confirmation: req.password_confirmation,
        remember_me,
    };

    let output = use_case.execute(input, fingerprint).await?;
    let cookie = session_cookie(&state.config, &output.issued.token, remember_me)?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(&output.user)),
    ))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<R, P>(
    State(state): State<AuthAppState<R, P>>,
    ClientContext(fingerprint): ClientContext,
    Json(req): Json<SignInRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: IdentityProvider + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let remember_me = req.remember_me;
    let input = SignInInput {
        email: req.email,
        password: req.password,
        remember_me,
    };

    let output = use_case.execute(input, fingerprint).await?;
    let cookie = session_cookie(&state.config, &output.issued.token, remember_me)?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(&output.user)),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
pub async fn sign_out<R, P>(
    State(state): State<AuthAppState<R, P>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: IdentityProvider + Send + Sync + 'static,
{
    if let Some(token) = extract_cookie(&headers, &state.config.session_cookie_name) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        // The cookie is cleared either way
        if let Err(e) = use_case.execute(&token).await {
            tracing::debug!(error = %e, "Sign out with unusable session cookie");
        }
    }

    let cookie = clear_cookie(&state.config.session_cookie(false))?;

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/status
pub async fn session_status<R, P>(
    State(state): State<AuthAppState<R, P>>,
    ClientContext(fingerprint): ClientContext,
    headers: HeaderMap,
) -> AuthResult<Json<SessionStatusResponse>>
where
    R: AuthStore,
    P: IdentityProvider + Send + Sync + 'static,
{
    let Some(token) = extract_cookie(&headers, &state.config.session_cookie_name) else {
        return Ok(Json(SessionStatusResponse::default()));
    };

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());
    let Ok(session) = use_case.execute(&token, &fingerprint.hash).await else {
        return Ok(Json(SessionStatusResponse::default()));
    };

    let user = UserRepository::find_by_id(state.repo.as_ref(), &session.user_id)
        .await?
        .ok_or(AuthError::SessionInvalid)?;

    Ok(Json(SessionStatusResponse {
        authenticated: true,
        public_id: Some(user.public_id.to_string()),
        email: Some(user.email.as_str().to_string()),
        expires_at_ms: Some(session.expires_at_ms),
    }))
}

// ============================================================================
// OAuth
// ============================================================================

/// GET /api/auth/oauth/{provider}
pub async fn oauth_start<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Path(provider): Path<String>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: IdentityProvider + Send + Sync + 'static,
{
    let provider = state.provider(&provider)?;

    let oauth_state = random_token(OAUTH_STATE_BYTES);
    let cookie = set_cookie_header(&state.config.oauth_state_cookie(), &oauth_state)
        .ok_or_else(|| AuthError::Internal("Invalid OAuth state cookie".to_string()))?;

    tracing::debug!(provider = %provider.name(), "Redirecting to identity provider");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Redirect::to(&provider.authorize_url(&oauth_state)),
    ))
}

/// GET /api/auth/oauth/{provider}/callback
pub async fn oauth_callback<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Path(provider): Path<String>,
    Query(query): Query<OauthCallbackQuery>,
    ClientContext(fingerprint): ClientContext,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    P: IdentityProvider + Send + Sync + 'static,
{
    let provider = state.provider(&provider)?;

    if let Some(error) = query.error {
        return Err(AppError::unauthorized(format!(
            "Sign in with {} was not completed: {}",
            provider.name(),
            error
        ))
        .into());
    }
    let code = query
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing authorization code"))?;

    let input = OauthCallbackInput {
        code,
        state: query.state,
        expected_state: extract_cookie(&headers, &state.config.oauth_state_cookie_name),
    };

    let use_case = OauthSignInUseCase::new(state.repo.clone(), provider, state.config.clone());
    let output = use_case.execute(input, fingerprint).await?;

    tracing::info!(
        public_id = %output.user.public_id,
        outcome = ?output.outcome,
        "OAuth sign in completed"
    );

    let session = session_cookie(&state.config, &output.issued.token, true)?;
    let clear_state = clear_cookie(&state.config.oauth_state_cookie())?;

    Ok((
        AppendHeaders([
            (header::SET_COOKIE, session),
            (header::SET_COOKIE, clear_state),
        ]),
        Redirect::to(&state.config.oauth_success_redirect),
    ))
}

/// GET /api/auth/authorizations
pub async fn list_authorizations<R, P>(
    State(state): State<AuthAppState<R, P>>,
    current_user: CurrentUser,
) -> AuthResult<Json<Vec<AuthorizationResponse>>>
where
    R: AuthStore,
    P: IdentityProvider + Send + Sync + 'static,
{
    let use_case = ListAuthorizationsUseCase::new(state.repo.clone());
    let authorizations = use_case.execute(&current_user.user_id).await?;

    Ok(Json(
        authorizations
            .iter()
            .map(AuthorizationResponse::from)
            .collect(),
    ))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn session_cookie(config: &AuthConfig, token: &str, remember_me: bool) -> AuthResult<HeaderValue> {
    set_cookie_header(&config.session_cookie(remember_me), token)
        .ok_or_else(|| AuthError::Internal("Invalid session cookie".to_string()))
}

fn clear_cookie(cookie: &CookieConfig) -> AuthResult<HeaderValue> {
    delete_cookie_header(cookie)
        .ok_or_else(|| AuthError::Internal("Invalid cookie name".to_string()))
}
