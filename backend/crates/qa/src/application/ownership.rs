//! Resolve who owns a votable or linkable resource

use kernel::id::UserId;

use crate::domain::repository::{AnswerRepository, QuestionRepository};
use crate::domain::value_objects::ResourceRef;
use crate::error::{QaError, QaResult};

/// Author of the referenced question or answer; missing targets are 404
pub(crate) async fn author_of<R>(repo: &R, target: &ResourceRef) -> QaResult<UserId>
where
    R: QuestionRepository + AnswerRepository,
{
    match target {
        ResourceRef::Question(id) => QuestionRepository::find_by_id(repo, id)
            .await?
            .map(|question| question.author_id)
            .ok_or(QaError::QuestionNotFound),
        ResourceRef::Answer(id) => AnswerRepository::find_by_id(repo, id)
            .await?
            .map(|answer| answer.author_id)
            .ok_or(QaError::AnswerNotFound),
    }
}
