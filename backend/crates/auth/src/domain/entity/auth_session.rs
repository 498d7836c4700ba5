//! Server-side session
//!
//! The cookie only carries the signed `session_id`; the session itself,
//! including the client it was issued to, lives in `auth_sessions`.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use platform::client::ClientFingerprint;
use uuid::Uuid;

use crate::domain::value_object::public_id::PublicId;

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session_id: Uuid,
    pub user_id: UserId,
    pub public_id: PublicId,
    /// Unix milliseconds
    pub expires_at_ms: i64,
    /// Remember-me sessions get sliding expiry
    pub remember_me: bool,
    /// SHA-256 of the user agent; a mismatch rejects the session
    pub client_fingerprint_hash: Vec<u8>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn new(
        user_id: UserId,
        public_id: PublicId,
        remember_me: bool,
        fingerprint: &ClientFingerprint,
        ttl: Duration,
    ) -> Self {
        let issued = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            user_id,
            public_id,
            expires_at_ms: (issued + ttl).timestamp_millis(),
            remember_me,
            client_fingerprint_hash: fingerprint.hash_vec(),
            client_ip: fingerprint.ip_string(),
            user_agent: fingerprint.user_agent.clone(),
            created_at: issued,
            last_activity_at: issued,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ms() == 0
    }

    /// Milliseconds until expiry, zero once expired
    pub fn remaining_ms(&self) -> i64 {
        (self.expires_at_ms - Utc::now().timestamp_millis()).max(0)
    }

    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }

    /// Push a remember-me session out to `now + window` once less than half
    /// of `window` is left. Other sessions keep their fixed expiry.
    pub fn extend_if_needed(&mut self, window: Duration) {
        if self.remember_me && self.remaining_ms() < (window / 2).num_milliseconds() {
            self.expires_at_ms = (Utc::now() + window).timestamp_millis();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(remember_me: bool, ttl: Duration) -> AuthSession {
        let fingerprint = ClientFingerprint::new([7u8; 32], None, Some("qa-test".to_string()));
        AuthSession::new(UserId::new(), PublicId::new(), remember_me, &fingerprint, ttl)
    }

    #[test]
    fn test_records_the_issuing_client() {
        let session = issue(false, Duration::hours(1));
        assert_eq!(session.client_fingerprint_hash, vec![7u8; 32]);
        assert_eq!(session.user_agent.as_deref(), Some("qa-test"));
        assert_eq!(session.created_at, session.last_activity_at);
    }

    #[test]
    fn test_expiry() {
        assert!(!issue(false, Duration::hours(1)).is_expired());

        let stale = issue(false, Duration::milliseconds(-1));
        assert!(stale.is_expired());
        assert_eq!(stale.remaining_ms(), 0);
    }

    #[test]
    fn test_sliding_expiry() {
        let week = Duration::days(7);

        let mut plain = issue(false, Duration::minutes(1));
        let fixed = plain.expires_at_ms;
        plain.extend_if_needed(week);
        assert_eq!(plain.expires_at_ms, fixed);

        let mut remembered = issue(true, Duration::minutes(1));
        remembered.extend_if_needed(week);
        assert!(remembered.remaining_ms() > Duration::days(6).num_milliseconds());

        let mut fresh = issue(true, week);
        let untouched = fresh.expires_at_ms;
        fresh.extend_if_needed(week);
        assert_eq!(fresh.expires_at_ms, untouched);
    }
}
