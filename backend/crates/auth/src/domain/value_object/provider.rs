//! External identity value objects
//!
//! An external identity is the pair (provider, uid). Both halves are
//! validated so the `authorizations` uniqueness constraint sees canonical
//! values.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const PROVIDER_MAX_LENGTH: usize = 32;
const UID_MAX_LENGTH: usize = 255;

/// Lower-case provider name such as `github`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub struct ProviderName(String);

impl ProviderName {
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into().trim().to_ascii_lowercase();

        if name.is_empty() || name.len() > PROVIDER_MAX_LENGTH {
            return Err(AppError::unprocessable("Validation failed")
                .with_field_error("provider", "must be 1 to 32 characters"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(AppError::unprocessable("Validation failed")
                .with_field_error("provider", "is invalid"));
        }

        Ok(Self(name))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The provider's identifier for the account, always stored as text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub struct ExternalUid(String);

impl ExternalUid {
    pub fn new(uid: impl Into<String>) -> AppResult<Self> {
        let uid = uid.into().trim().to_string();

        if uid.is_empty() {
            return Err(AppError::unprocessable("Validation failed")
                .with_field_error("uid", "can't be blank"));
        }
        if uid.len() > UID_MAX_LENGTH {
            return Err(AppError::unprocessable("Validation failed")
                .with_field_error("uid", "is too long (maximum is 255 characters)"));
        }

        Ok(Self(uid))
    }

    pub fn from_db(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name_lowercased() {
        assert_eq!(ProviderName::new("GitHub").unwrap().as_str(), "github");
        assert_eq!(ProviderName::new("google_oauth2").unwrap().to_string(), "google_oauth2");
    }

    #[test]
    fn test_provider_name_invalid() {
        assert!(ProviderName::new("").is_err());
        assert!(ProviderName::new("git hub").is_err());
        assert!(ProviderName::new("a".repeat(33)).is_err());
    }

    #[test]
    fn test_uid() {
        assert_eq!(ExternalUid::new(" 123456 ").unwrap().as_str(), "123456");
        assert_eq!(ExternalUid::new("  ").unwrap_err().status_code(), 422);
        assert!(ExternalUid::new("x".repeat(256)).is_err());
    }
}
