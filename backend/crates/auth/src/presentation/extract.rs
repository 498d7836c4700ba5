//! Request extractors
//!
//! `ClientContext` fingerprints the caller. `CurrentUser` reads the identity
//! that the `authenticate` middleware resolved from the session cookie.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use kernel::id::UserId;
use platform::client::{ClientFingerprint, extract_fingerprint};

use crate::domain::value_object::public_id::PublicId;
use crate::error::AuthError;

/// Fingerprint of the calling client
///
/// The peer address comes from `ConnectInfo` when the server provides it.
#[derive(Debug, Clone)]
pub struct ClientContext(pub ClientFingerprint);

impl<S> FromRequestParts<S> for ClientContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());

        Ok(Self(extract_fingerprint(&parts.headers, peer_ip)))
    }
}

/// Authenticated user of the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub public_id: PublicId,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or(AuthError::Unauthenticated)
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().copied())
    }
}
