//! Update Question Use Case

use std::sync::Arc;

use kernel::error::field::FieldErrors;
use kernel::id::{QuestionId, UserId};

use crate::application::config::QaConfig;
use crate::application::input::check;
use crate::domain::entities::Question;
use crate::domain::repository::QuestionRepository;
use crate::domain::value_objects::{Body, ResourceKind, Title};
use crate::error::{QaError, QaResult};

/// Partial update; absent fields are left unchanged
#[derive(Debug, Default)]
pub struct UpdateQuestionInput {
    pub title: Option<String>,
    pub body: Option<String>,
}

pub struct UpdateQuestionUseCase<R>
where
    R: QuestionRepository,
{
    repo: Arc<R>,
    config: Arc<QaConfig>,
}

impl<R> UpdateQuestionUseCase<R>
where
    R: QuestionRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<QaConfig>) -> Self {
        Self { repo, config }
    }

    /// Only the author may update; anyone else gets `NotAuthor` and nothing
    /// is written
    pub async fn execute(
        &self,
        actor_id: &UserId,
        question_id: &QuestionId,
        input: UpdateQuestionInput,
    ) -> QaResult<Question> {
        let mut question = self
            .repo
            .find_by_id(question_id)
            .await?
            .ok_or(QaError::QuestionNotFound)?;

        if !question.is_authored_by(actor_id) {
            return Err(QaError::NotAuthor(ResourceKind::Question));
        }

        let mut errors = FieldErrors::new();
        let title = input.title.and_then(|title| {
            check(
                &mut errors,
                "title",
                Title::parse(title, self.config.title_max_len),
            )
        });
        let body = input.body.and_then(|body| {
            check(
                &mut errors,
                "body",
                Body::parse(body, self.config.body_max_len),
            )
        });
        errors.into_result()?;

        question.edit(title, body);
        self.repo.update(&question).await?;

        tracing::info!(question_id = %question_id, "Question updated");
        Ok(question)
    }
}
