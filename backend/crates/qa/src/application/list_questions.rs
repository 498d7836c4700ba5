//! List Questions Use Case

use std::sync::Arc;

use crate::domain::entities::QuestionSummary;
use crate::domain::repository::QuestionRepository;
use crate::error::QaResult;

pub struct ListQuestionsUseCase<R>
where
    R: QuestionRepository,
{
    repo: Arc<R>,
}

impl<R> ListQuestionsUseCase<R>
where
    R: QuestionRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Newest first, each with its vote sum
    pub async fn execute(&self) -> QaResult<Vec<QuestionSummary>> {
        self.repo.list().await
    }
}
