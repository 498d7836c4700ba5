//! User Entity
//!
//! Identity record. Credentials and linked external identities live in
//! their own entities and reference the user by id.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::entity::{authorization::Authorization, credentials::Credentials};
use crate::domain::value_object::{email::Email, public_id::PublicId};

#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Public-facing nanoid identifier (URL-safe)
    pub public_id: PublicId,
    /// Unique, lower-cased
    pub email: Email,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: Email) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            public_id: PublicId::new(),
            email,
            created_at: now,
            updated_at: now,
        }
    }

    /// Ownership predicate: does the resource's author id point at this user?
    pub fn is_author_of(&self, author_id: &UserId) -> bool {
        self.user_id == *author_id
    }
}

/// Everything written when an account is created, persisted atomically
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user: User,
    pub credentials: Credentials,
    /// Present when the account is created from an external identity
    pub authorization: Option<Authorization>,
}
