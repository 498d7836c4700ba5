//! Session tokens and session issuance
//!
//! The cookie value is `{session_id}.{base64url(HMAC-SHA256(session_id))}`.
//! Only the id travels; everything else stays in `auth_sessions`.

use platform::client::ClientFingerprint;
use platform::crypto::{constant_time_eq, from_base64_url, hmac_sha256, to_base64_url};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::repository::AuthSessionRepository;
use crate::error::{AuthError, AuthResult};

pub fn sign(secret: &[u8; 32], session_id: Uuid) -> String {
    let session_id = session_id.to_string();
    let signature = hmac_sha256(secret, session_id.as_bytes());
    format!("{}.{}", session_id, to_base64_url(&signature))
}

/// Verify the signature and return the session id
pub fn verify(secret: &[u8; 32], token: &str) -> AuthResult<Uuid> {
    let (session_id, signature_b64) = token.split_once('.').ok_or(AuthError::SessionInvalid)?;

    let signature = from_base64_url(signature_b64).map_err(|_| AuthError::SessionInvalid)?;
    let expected = hmac_sha256(secret, session_id.as_bytes());
    if !constant_time_eq(&expected, &signature) {
        return Err(AuthError::SessionInvalid);
    }

    session_id.parse().map_err(|_| AuthError::SessionInvalid)
}

/// A freshly stored session and the cookie token that references it
#[derive(Debug)]
pub struct IssuedSession {
    pub session: AuthSession,
    pub token: String,
}

/// Create and persist a session for `user`
pub async fn issue<S>(
    session_repo: &S,
    config: &AuthConfig,
    user: &User,
    remember_me: bool,
    fingerprint: &ClientFingerprint,
) -> AuthResult<IssuedSession>
where
    S: AuthSessionRepository,
{
    let ttl = chrono::Duration::from_std(config.session_ttl(remember_me))
        .map_err(|e| AuthError::Internal(format!("Invalid session TTL: {e}")))?;

    let session = AuthSession::new(
        user.user_id,
        user.public_id,
        remember_me,
        fingerprint,
        ttl,
    );
    session_repo.create(&session).await?;

    let token = sign(&config.session_secret, session.session_id);

    tracing::info!(
        public_id = %user.public_id,
        session_id = %session.session_id,
        remember_me,
        "Session issued"
    );

    Ok(IssuedSession { session, token })
}
