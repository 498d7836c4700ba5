//! HTTP-facing error classification

use std::fmt;

/// What went wrong, from the client's point of view
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::Conflict.status_code(), 409);
/// assert_eq!(ErrorKind::Conflict.reason(), "Conflict");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    BadRequest,
    /// No valid session, or wrong credentials
    Unauthorized,
    /// Signed in, but not the owner of the resource
    Forbidden,
    NotFound,
    /// Duplicate vote, subscription, email or provider identity
    Conflict,
    UnprocessableEntity,
    InternalServerError,
    /// The identity provider misbehaved
    BadGateway,
    ServiceUnavailable,
}

impl ErrorKind {
    const fn parts(self) -> (u16, &'static str) {
        match self {
            Self::BadRequest => (400, "Bad Request"),
            Self::Unauthorized => (401, "Unauthorized"),
            Self::Forbidden => (403, "Forbidden"),
            Self::NotFound => (404, "Not Found"),
            Self::Conflict => (409, "Conflict"),
            Self::UnprocessableEntity => (422, "Unprocessable Entity"),
            Self::InternalServerError => (500, "Internal Server Error"),
            Self::BadGateway => (502, "Bad Gateway"),
            Self::ServiceUnavailable => (503, "Service Unavailable"),
        }
    }

    pub const fn status_code(self) -> u16 {
        self.parts().0
    }

    /// Reason phrase, used as the problem document title
    pub const fn reason(self) -> &'static str {
        self.parts().1
    }

    pub const fn is_server_error(self) -> bool {
        self.status_code() >= 500
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}
