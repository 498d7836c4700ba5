//! The error every crate eventually turns into
//!
//! Domain crates keep their own `thiserror` enums and convert into
//! [`AppError`] at the HTTP edge. With the `axum` feature an [`AppError`] is
//! itself a response: an RFC 7807 problem document, plus an `errors` array
//! when validation failed.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::field::FieldError;
use super::kind::ErrorKind;

type Message = Cow<'static, str>;
type Source = Box<dyn Error + Send + Sync + 'static>;

/// ```rust
/// use kernel::error::app_error::AppError;
///
/// let err = AppError::unprocessable("Validation failed")
///     .with_field_error("title", "can't be blank");
/// assert_eq!(err.status_code(), 422);
/// assert_eq!(err.field_errors().len(), 1);
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Message,
    /// What the client should do about it
    action: Option<Message>,
    errors: Vec<FieldError>,
    /// Kept for logs, never serialized
    source: Option<Source>,
}

pub type AppResult<T> = Result<T, AppError>;

macro_rules! constructors {
    ($($name:ident => $kind:ident),* $(,)?) => {
        $(
            pub fn $name(message: impl Into<Message>) -> Self {
                Self::new(ErrorKind::$kind, message)
            }
        )*
    };
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Message>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            errors: Vec::new(),
            source: None,
        }
    }

    constructors! {
        bad_request => BadRequest,
        unauthorized => Unauthorized,
        forbidden => Forbidden,
        not_found => NotFound,
        conflict => Conflict,
        unprocessable => UnprocessableEntity,
        internal => InternalServerError,
        bad_gateway => BadGateway,
        service_unavailable => ServiceUnavailable,
    }

    /// 422 listing every invalid field
    pub fn validation(errors: impl IntoIterator<Item = FieldError>) -> Self {
        let mut err = Self::unprocessable("Validation failed");
        err.errors.extend(errors);
        err
    }

    pub fn with_action(self, action: impl Into<Message>) -> Self {
        Self {
            action: Some(action.into()),
            ..self
        }
    }

    pub fn with_field_error(mut self, field: impl Into<Message>, message: impl Into<Message>) -> Self {
        self.errors.push(FieldError::new(field, message));
        self
    }

    pub fn with_source(self, source: impl Error + Send + Sync + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..self
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.errors
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("action", &self.action)
            .field("errors", &self.errors)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        for (i, error) in self.errors.iter().enumerate() {
            let sep = if i == 0 { " (" } else { ", " };
            write!(f, "{sep}{error}")?;
        }
        if !self.errors.is_empty() {
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.source {
            Some(source) => Some(source.as_ref()),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_pick_the_kind() {
        assert_eq!(AppError::unauthorized("x").kind(), ErrorKind::Unauthorized);
        assert_eq!(AppError::forbidden("x").status_code(), 403);
        assert_eq!(AppError::not_found("x").status_code(), 404);
        assert_eq!(AppError::conflict("x").status_code(), 409);
        assert_eq!(AppError::bad_gateway("x").status_code(), 502);
    }

    #[test]
    fn test_validation_lists_fields_in_order() {
        let err = AppError::validation([
            FieldError::new("title", "can't be blank"),
            FieldError::new("body", "can't be blank"),
        ]);

        assert_eq!(err.status_code(), 422);
        assert_eq!(
            err.to_string(),
            "Unprocessable Entity: Validation failed (title can't be blank, body can't be blank)"
        );
    }

    #[test]
    fn test_action_and_source_are_optional() {
        let plain = AppError::not_found("Question not found");
        assert!(plain.action().is_none());
        assert!(plain.source().is_none());
        assert_eq!(plain.to_string(), "Not Found: Question not found");

        let err = AppError::unauthorized("Sign in required")
            .with_action("Sign in or sign up")
            .with_source(std::io::Error::other("expired"));
        assert_eq!(err.action(), Some("Sign in or sign up"));
        assert!(err.source().is_some());
    }
}
