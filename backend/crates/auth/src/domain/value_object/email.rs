//! Email Value Object
//!
//! Trimmed, lower-cased address with basic format validation. Emails are the
//! join key between password accounts and OAuth identities, so normalisation
//! must be identical on every path.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Domain used for addresses synthesised for provider accounts without email
pub const PLACEHOLDER_DOMAIN: &str = "oauth.invalid";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Validate and normalise; failures are 422 with an `email` field error
    pub fn new(email: impl Into<String>) -> AppResult<Self> {
        Self::parse(email).map_err(|message| {
            AppError::unprocessable("Validation failed").with_field_error("email", message)
        })
    }

    /// Validation with the bare reason, for callers collecting field errors
    pub fn parse(email: impl Into<String>) -> Result<Self, &'static str> {
        let email = email.into().trim().to_lowercase();

        if email.is_empty() {
            return Err("can't be blank");
        }
        if email.len() > EMAIL_MAX_LENGTH {
            return Err("is too long (maximum is 254 characters)");
        }
        if !Self::is_valid_format(&email) {
            return Err("is invalid");
        }

        Ok(Self(email))
    }

    /// Address for a provider account that reported no email
    ///
    /// `github` + `123456` becomes `123456@github.oauth.invalid`. A uid that
    /// is not purely lower-case ASCII alphanumeric is hex-encoded behind an
    /// `x-` prefix (`a/b` becomes `x-612f62`), so distinct uids never share an
    /// address. A uid too long for the local part is a validation error.
    pub fn placeholder(provider: &str, uid: &str) -> AppResult<Self> {
        let plain = !uid.is_empty()
            && uid
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase());
        let local = if plain {
            uid.to_string()
        } else {
            let hex: String = uid.bytes().map(|b| format!("{b:02x}")).collect();
            format!("x-{hex}")
        };
        Self::new(format!("{local}@{provider}.{PLACEHOLDER_DOMAIN}"))
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > 64 || domain.contains('@') {
            return false;
        }
        if local.chars().any(char::is_whitespace) {
            return false;
        }

        if domain.is_empty() || !domain.contains('.') {
            return false;
        }
        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return false;
        }
        if domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) {
            return false;
        }
        !domain.contains("..")
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_placeholder(&self) -> bool {
        self.domain().ends_with(PLACEHOLDER_DOMAIN)
    }

    pub fn domain(&self) -> &str {
        self.0.split('@').nth(1).unwrap_or("")
    }
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_normalised() {
        let email = Email::new("  New@User.COM ").unwrap();
        assert_eq!(email.as_str(), "new@user.com");
    }

    #[test]
    fn test_email_valid() {
        assert!(Email::new("user.name@example.co.jp").is_ok());
        assert!(Email::new("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        for raw in [
            "",
            "userexample.com",
            "user@",
            "@example.com",
            "user@@example.com",
            "user@example",
            "user@-example.com",
            "user@example..com",
            "us er@example.com",
        ] {
            assert!(Email::new(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_invalid_email_is_field_error() {
        let err = Email::new("nope").unwrap_err();
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.field_errors()[0].field, "email");
        assert_eq!(err.field_errors()[0].message, "is invalid");
    }

    #[test]
    fn test_placeholder() {
        let email = Email::placeholder("github", "123456").unwrap();
        assert_eq!(email.as_str(), "123456@github.oauth.invalid");
        assert!(email.is_placeholder());
        assert!(!Email::new("a@b.com").unwrap().is_placeholder());
    }

    #[test]
    fn test_placeholder_encodes_uid_without_collisions() {
        let spaced = Email::placeholder("github", "a b").unwrap();
        let slashed = Email::placeholder("github", "a/b").unwrap();
        let upper = Email::placeholder("github", "AB").unwrap();
        let lower = Email::placeholder("github", "ab").unwrap();

        assert_eq!(spaced.as_str(), "x-612062@github.oauth.invalid");
        assert_eq!(slashed.as_str(), "x-612f62@github.oauth.invalid");
        assert_eq!(lower.as_str(), "ab@github.oauth.invalid");
        assert_ne!(upper, lower);
        assert_ne!(spaced, slashed);
    }

    #[test]
    fn test_placeholder_rejects_oversized_uid() {
        assert!(Email::placeholder("github", &"9".repeat(65)).is_err());
    }
}
