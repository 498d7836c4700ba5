//! Revoke Vote Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::ownership::author_of;
use crate::domain::repository::{AnswerRepository, QuestionRepository, VoteRepository};
use crate::domain::value_objects::ResourceRef;
use crate::error::{QaError, QaResult};

pub struct RevokeVoteUseCase<R>
where
    R: QuestionRepository + AnswerRepository + VoteRepository,
{
    repo: Arc<R>,
}

impl<R> RevokeVoteUseCase<R>
where
    R: QuestionRepository + AnswerRepository + VoteRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Remove the voter's own vote on `target`; returns the new vote sum
    pub async fn execute(&self, voter_id: &UserId, target: ResourceRef) -> QaResult<i64> {
        let repo = self.repo.as_ref();

        // 404 for a missing target rather than for a missing vote
        author_of(repo, &target).await?;

        let vote = repo
            .find_by_user(&target, voter_id)
            .await?
            .ok_or(QaError::VoteNotFound(target.kind()))?;
        VoteRepository::delete(repo, &vote.vote_id).await?;

        tracing::info!(
            vote_id = %vote.vote_id,
            votable_kind = %target.kind(),
            votable_id = %target.id(),
            "Vote revoked"
        );

        repo.sum_for(&target).await
    }
}
