//! Password policy and Argon2id hashing
//!
//! Input is NFKC-normalized and checked against a NIST SP 800-63B style
//! policy (length in code points, no control characters, no well-known weak
//! passwords). Hashes are Argon2id PHC strings; an optional pepper is appended
//! to the password before hashing and verification.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::{RngCore, rngs::OsRng};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

const GENERATED_LENGTH: usize = 32;
const GENERATED_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const WEAK_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "iloveyou",
    "letmein",
    "welcome",
    "welcome1",
    "admin123",
    "sunshine",
    "football",
    "baseball",
    "trustno1",
    "abcdefgh",
];

const KEYBOARD_RUNS: &[&str] = &["qwerty", "asdfgh", "zxcvbn", "qazwsx", "1qaz2wsx"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    /// Well-known password, keyboard run, repeated or sequential characters
    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear text
// ============================================================================

/// Password as typed by the user
///
/// Zeroized on drop, not `Clone`, redacted in `Debug`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalize and validate
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let mut raw = raw;
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();

        let password = Self(normalized);
        check_policy(&password.0)?;
        Ok(password)
    }

    /// Random password nobody ever sees, for accounts whose only way in is
    /// an external identity provider
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0u8; GENERATED_LENGTH]);
        OsRng.fill_bytes(&mut bytes[..]);
        Self(
            bytes
                .iter()
                .map(|b| GENERATED_ALPHABET[usize::from(b & 0x3f)] as char)
                .collect(),
        )
    }

    #[cfg(test)]
    fn unchecked(raw: &str) -> Self {
        Self(raw.to_string())
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        if let Some(pepper) = pepper {
            bytes.extend_from_slice(pepper);
        }
        bytes
    }

    /// Argon2id with a fresh random salt and the crate's default cost
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(&self.peppered(pepper), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword(hash.to_string()))
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword([REDACTED])")
    }
}

fn check_policy(password: &str) -> Result<(), PasswordPolicyError> {
    if password.trim().is_empty() {
        return Err(PasswordPolicyError::EmptyOrWhitespace);
    }

    let actual = password.chars().count();
    if actual < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_LENGTH,
            actual,
        });
    }
    if actual > MAX_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooLong {
            max: MAX_PASSWORD_LENGTH,
            actual,
        });
    }

    // Tabs and newlines are allowed
    if password
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\t' | '\n'))
    {
        return Err(PasswordPolicyError::InvalidCharacter);
    }

    if is_predictable(password) {
        return Err(PasswordPolicyError::CommonPattern);
    }

    Ok(())
}

fn is_predictable(password: &str) -> bool {
    let lower = password.to_lowercase();

    if WEAK_PASSWORDS.contains(&lower.as_str()) {
        return true;
    }
    if KEYBOARD_RUNS.iter().any(|run| lower.contains(run)) {
        return true;
    }

    let mut chars = lower.chars();
    let first = chars.next();
    if chars.all(|c| Some(c) == first) {
        return true;
    }

    is_digit_run(&lower)
}

/// Only digits, each one step up or down from the previous (wrapping 9/0)
fn is_digit_run(s: &str) -> bool {
    let digits: Option<Vec<u32>> = s.chars().map(|c| c.to_digit(10)).collect();
    let Some(digits) = digits else {
        return false;
    };
    if digits.len() < 4 {
        return false;
    }

    let step = |a: u32, b: u32| (b + 10 - a) % 10;
    let steps: Vec<u32> = digits.windows(2).map(|w| step(w[0], w[1])).collect();
    steps.iter().all(|&s| s == 1) || steps.iter().all(|&s| s == 9)
}

// ============================================================================
// Hash
// ============================================================================

/// Argon2id hash in PHC string form, safe to store
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap a stored PHC string, rejecting anything that does not parse
    pub fn from_phc_string(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = phc.into();
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self(phc))
    }

    pub fn as_phc_string(&self) -> &str {
        &self.0
    }

    /// `pepper` must be the one the hash was created with
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.0) else {
            return false;
        };

        Argon2::default()
            .verify_password(&password.peppered(pepper), &parsed)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([HASH])")
    }
}
