//! Auth Assertion
//!
//! Provider-neutral result of an external login: who the provider says the
//! user is. Produced by an `IdentityProvider`, consumed by identity
//! reconciliation.

use crate::domain::value_object::provider::{ExternalUid, ProviderName};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthAssertion {
    pub provider: ProviderName,
    pub uid: ExternalUid,
    pub email: Option<String>,
}

impl AuthAssertion {
    pub fn new(provider: ProviderName, uid: ExternalUid, email: Option<String>) -> Self {
        Self {
            provider,
            uid,
            email,
        }
    }

    /// The email, unless missing or blank
    pub fn usable_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}
