//! Mark Best Answer Use Case
//!
//! The question's author picks one answer as the best. A previous best answer
//! loses the flag, and the question's reward (if any) moves to the new best
//! answer's author.

use std::sync::Arc;

use kernel::id::{AnswerId, UserId};

use crate::application::show_question::{AnswerDetail, load_answer_detail};
use crate::domain::repository::{
    AnswerRepository, LinkRepository, QuestionRepository, RewardRepository, VoteRepository,
};
use crate::error::{QaError, QaResult};

pub struct MarkBestAnswerUseCase<R>
where
    R: QuestionRepository + AnswerRepository + RewardRepository + LinkRepository + VoteRepository,
{
    repo: Arc<R>,
}

impl<R> MarkBestAnswerUseCase<R>
where
    R: QuestionRepository + AnswerRepository + RewardRepository + LinkRepository + VoteRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, actor_id: &UserId, answer_id: &AnswerId) -> QaResult<AnswerDetail> {
        let repo = self.repo.as_ref();

        let mut answer = AnswerRepository::find_by_id(repo, answer_id)
            .await?
            .ok_or(QaError::AnswerNotFound)?;
        let question = QuestionRepository::find_by_id(repo, &answer.question_id)
            .await?
            .ok_or(QaError::QuestionNotFound)?;

        if !question.is_authored_by(actor_id) {
            return Err(QaError::NotQuestionAuthor);
        }

        if answer.best {
            return load_answer_detail(repo, answer).await;
        }

        let mut reward = repo.find_by_question(&question.question_id).await?;
        if let Some(reward) = reward.as_mut() {
            reward.award_to(answer.author_id);
        }

        answer.best = true;
        repo.mark_best(&answer, reward.as_ref()).await?;

        tracing::info!(
            answer_id = %answer_id,
            question_id = %question.question_id,
            rewarded = reward.is_some(),
            "Best answer chosen"
        );

        load_answer_detail(repo, answer).await
    }
}
