//! Cast Vote Use Case

use std::sync::Arc;

use kernel::error::app_error::AppError;
use kernel::error::field::FieldError;
use kernel::id::UserId;

use crate::application::ownership::author_of;
use crate::domain::entities::Vote;
use crate::domain::repository::{AnswerRepository, QuestionRepository, VoteRepository};
use crate::domain::value_objects::{ResourceRef, VoteValue};
use crate::error::{QaError, QaResult};

pub struct CastVoteUseCase<R>
where
    R: QuestionRepository + AnswerRepository + VoteRepository,
{
    repo: Arc<R>,
}

impl<R> CastVoteUseCase<R>
where
    R: QuestionRepository + AnswerRepository + VoteRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Vote `value` (+1 or -1) on `target`; returns the new vote sum
    pub async fn execute(&self, voter_id: UserId, target: ResourceRef, value: i64) -> QaResult<i64> {
        let repo = self.repo.as_ref();

        if author_of(repo, &target).await? == voter_id {
            return Err(QaError::OwnResourceVote(target.kind()));
        }

        let value = VoteValue::parse(value)
            .map_err(|message| AppError::validation([FieldError::new("value", message)]))?;

        if repo.find_by_user(&target, &voter_id).await?.is_some() {
            return Err(QaError::AlreadyVoted(target.kind()));
        }

        let vote = Vote::new(target, voter_id, value);
        VoteRepository::create(repo, &vote).await?;

        tracing::info!(
            vote_id = %vote.vote_id,
            votable_kind = %target.kind(),
            votable_id = %target.id(),
            value = value.value(),
            "Vote cast"
        );

        repo.sum_for(&target).await
    }
}
