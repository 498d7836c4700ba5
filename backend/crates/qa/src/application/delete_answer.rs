//! Delete Answer Use Case

use std::sync::Arc;

use kernel::id::{AnswerId, UserId};

use crate::domain::repository::AnswerRepository;
use crate::domain::value_objects::ResourceKind;
use crate::error::{QaError, QaResult};

pub struct DeleteAnswerUseCase<R>
where
    R: AnswerRepository,
{
    repo: Arc<R>,
}

impl<R> DeleteAnswerUseCase<R>
where
    R: AnswerRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, actor_id: &UserId, answer_id: &AnswerId) -> QaResult<()> {
        let answer = self
            .repo
            .find_by_id(answer_id)
            .await?
            .ok_or(QaError::AnswerNotFound)?;

        if !answer.is_authored_by(actor_id) {
            return Err(QaError::NotAuthor(ResourceKind::Answer));
        }

        self.repo.delete(answer_id).await?;

        tracing::info!(
            answer_id = %answer_id,
            question_id = %answer.question_id,
            "Answer deleted"
        );
        Ok(())
    }
}
