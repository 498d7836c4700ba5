//! Q&A Error Types
//!
//! Errors of the questions/answers domain, converted into the unified
//! `kernel::error::AppError` for responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_objects::ResourceKind;

pub type QaResult<T> = Result<T, QaError>;

#[derive(Debug, Error)]
pub enum QaError {
    #[error("Question not found")]
    QuestionNotFound,

    #[error("Answer not found")]
    AnswerNotFound,

    #[error("Link not found")]
    LinkNotFound,

    #[error("Subscription not found")]
    SubscriptionNotFound,

    /// Revoking a vote that was never cast
    #[error("You have not voted for this {0}")]
    VoteNotFound(ResourceKind),

    /// Mutation of a resource by someone other than its owner
    #[error("You are not the author of this {0}")]
    NotAuthor(ResourceKind),

    #[error("Only the question author can choose the best answer")]
    NotQuestionAuthor,

    #[error("You can't vote for your own {0}")]
    OwnResourceVote(ResourceKind),

    #[error("You can only unsubscribe yourself")]
    NotSubscriber,

    #[error("You have already voted for this {0}")]
    AlreadyVoted(ResourceKind),

    #[error("You are already subscribed to this question")]
    AlreadySubscribed,

    /// Validation and other errors already expressed as `AppError`
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QaError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            QaError::QuestionNotFound
            | QaError::AnswerNotFound
            | QaError::LinkNotFound
            | QaError::SubscriptionNotFound
            | QaError::VoteNotFound(_) => ErrorKind::NotFound,
            QaError::NotAuthor(_)
            | QaError::NotQuestionAuthor
            | QaError::OwnResourceVote(_)
            | QaError::NotSubscriber => ErrorKind::Forbidden,
            QaError::AlreadyVoted(_) | QaError::AlreadySubscribed => ErrorKind::Conflict,
            QaError::App(e) => e.kind(),
            QaError::Database(e) if is_unique_violation(e) => ErrorKind::Conflict,
            QaError::Database(_) | QaError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    fn log(&self) {
        match self {
            QaError::Database(e) => {
                tracing::error!(error = %e, "Q&A database error");
            }
            QaError::Internal(msg) => {
                tracing::error!(message = %msg, "Q&A internal error");
            }
            QaError::NotAuthor(_)
            | QaError::NotQuestionAuthor
            | QaError::OwnResourceVote(_)
            | QaError::NotSubscriber => {
                tracing::warn!(error = %self, "Forbidden mutation refused");
            }
            _ => {
                tracing::debug!(error = %self, "Q&A error");
            }
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23505")
}

impl From<QaError> for AppError {
    fn from(err: QaError) -> Self {
        match err {
            QaError::App(e) => e,
            QaError::Database(e) => AppError::from(e),
            QaError::Internal(_) => AppError::internal("Internal server error"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for QaError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
