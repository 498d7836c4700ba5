//! Delete Question Use Case

use std::sync::Arc;

use kernel::id::{QuestionId, UserId};

use crate::domain::repository::QuestionRepository;
use crate::domain::value_objects::ResourceKind;
use crate::error::{QaError, QaResult};

pub struct DeleteQuestionUseCase<R>
where
    R: QuestionRepository,
{
    repo: Arc<R>,
}

impl<R> DeleteQuestionUseCase<R>
where
    R: QuestionRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Delete the question and everything that hangs off it
    pub async fn execute(&self, actor_id: &UserId, question_id: &QuestionId) -> QaResult<()> {
        let question = self
            .repo
            .find_by_id(question_id)
            .await?
            .ok_or(QaError::QuestionNotFound)?;

        if !question.is_authored_by(actor_id) {
            return Err(QaError::NotAuthor(ResourceKind::Question));
        }

        self.repo.delete(question_id).await?;

        tracing::info!(question_id = %question_id, "Question deleted");
        Ok(())
    }
}
