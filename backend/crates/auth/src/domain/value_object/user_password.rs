//! User Password Value Object
//!
//! Domain wrappers around `platform::password`: policy violations become
//! `password` field errors, hashes are stored as PHC strings.
//!
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//!
//! let raw = RawPassword::new("MySecurePass123!".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, None).unwrap();
//! assert!(hashed.verify(&raw, None));
//! ```

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

/// Plain-text password from user input, zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate against the password policy
    ///
    /// Errors are 422 with a `password` field error.
    pub fn new(raw: String) -> AppResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(|e| {
                AppError::unprocessable("Validation failed")
                    .with_field_error("password", policy_message(&e))
            })
    }

    /// Random password for accounts created through an identity provider
    pub fn generate() -> Self {
        Self(ClearTextPassword::generate())
    }

    /// Parse for sign-in: never reports which rule failed
    pub fn for_verification(raw: String) -> Option<Self> {
        ClearTextPassword::new(raw).ok().map(Self)
    }

    fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

fn policy_message(err: &PasswordPolicyError) -> String {
    match err {
        PasswordPolicyError::TooShort { min, .. } => {
            format!("is too short (minimum is {min} characters)")
        }
        PasswordPolicyError::TooLong { max, .. } => {
            format!("is too long (maximum is {max} characters)")
        }
        PasswordPolicyError::EmptyOrWhitespace => "can't be blank".to_string(),
        PasswordPolicyError::InvalidCharacter => "contains invalid characters".to_string(),
        PasswordPolicyError::CommonPattern => "is too common".to_string(),
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

/// Argon2id hash, safe to store
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        let hashed = raw
            .inner()
            .hash(pepper)
            .map_err(|e| AppError::internal("Password hashing failed").with_source(e))?;
        Ok(Self(hashed))
    }

    /// Load a PHC string read from the database
    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)
            .map_err(|e| AppError::internal("Invalid password hash in database").with_source(e))?;
        Ok(Self(hashed))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_violations_are_field_errors() {
        let err = RawPassword::new("short".to_string()).unwrap_err();
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.field_errors()[0].field, "password");
        assert_eq!(
            err.field_errors()[0].message,
            "is too short (minimum is 8 characters)"
        );

        let err = RawPassword::new("password123".to_string()).unwrap_err();
        assert_eq!(err.field_errors()[0].message, "is too common");
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, Some(b"pepper")).unwrap();

        assert!(hashed.verify(&raw, Some(b"pepper")));
        assert!(!hashed.verify(&raw, None));

        let wrong = RawPassword::new("WrongPassword123!".to_string()).unwrap();
        assert!(!hashed.verify(&wrong, Some(b"pepper")));
    }

    #[test]
    fn test_phc_roundtrip() {
        let raw = RawPassword::generate();
        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        let restored = UserPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&raw, None));
    }

    #[test]
    fn test_invalid_phc_is_internal() {
        let err = UserPassword::from_phc_string("not-a-hash").unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_for_verification_swallows_policy() {
        assert!(RawPassword::for_verification("x".to_string()).is_none());
        assert!(RawPassword::for_verification("TestPassword123!".to_string()).is_some());
    }
}
