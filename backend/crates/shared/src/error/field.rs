//! Field Errors - per-field validation failures
//!
//! Validation collects every problem with an input before failing, so a
//! client can show all of them at once instead of one per round trip.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

use super::app_error::{AppError, AppResult};

/// A single validation failure attached to an input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as the client sent it (e.g. `title`, `links[0].url`)
    pub field: Cow<'static, str>,
    /// Human-readable reason
    pub message: Cow<'static, str>,
}

impl FieldError {
    pub fn new(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Accumulator for field errors
///
/// ## Examples
/// ```rust
/// use kernel::error::field::FieldErrors;
///
/// let mut errors = FieldErrors::new();
/// errors.push("title", "can't be blank");
/// let result = errors.into_result();
/// assert_eq!(result.unwrap_err().status_code(), 422);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) {
        self.0.push(FieldError::new(field, message));
    }

    /// Record the error of a validation result and return its value if any
    pub fn capture<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.0.push(err);
                None
            }
        }
    }

    /// Merge errors from a nested input, prefixing their field names
    pub fn extend_prefixed(&mut self, prefix: &str, other: FieldErrors) {
        self.0.extend(other.0.into_iter().map(|e| FieldError {
            field: Cow::Owned(format!("{}.{}", prefix, e.field)),
            message: e.message,
        }));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(())` if nothing was recorded, otherwise a 422 carrying every error
    pub fn into_result(self) -> AppResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.0))
        }
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl Extend<FieldError> for FieldErrors {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl From<FieldError> for FieldErrors {
    fn from(err: FieldError) -> Self {
        Self(vec![err])
    }
}
