//! Authorization Entity
//!
//! Link between a local user and one external identity. A given
//! (provider, uid) pair belongs to at most one user; the store enforces it
//! with a unique constraint.

use chrono::{DateTime, Utc};
use kernel::id::{AuthorizationId, UserId};

use crate::domain::value_object::provider::{ExternalUid, ProviderName};

#[derive(Debug, Clone)]
pub struct Authorization {
    pub authorization_id: AuthorizationId,
    pub user_id: UserId,
    pub provider: ProviderName,
    pub uid: ExternalUid,
    pub created_at: DateTime<Utc>,
}

impl Authorization {
    pub fn new(user_id: UserId, provider: ProviderName, uid: ExternalUid) -> Self {
        Self {
            authorization_id: AuthorizationId::new(),
            user_id,
            provider,
            uid,
            created_at: Utc::now(),
        }
    }

    pub fn matches(&self, provider: &ProviderName, uid: &ExternalUid) -> bool {
        self.provider == *provider && self.uid == *uid
    }
}
