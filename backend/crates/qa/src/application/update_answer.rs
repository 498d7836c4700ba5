//! Update Answer Use Case

use std::sync::Arc;

use kernel::error::field::FieldErrors;
use kernel::id::{AnswerId, UserId};

use crate::application::config::QaConfig;
use crate::application::input::check;
use crate::application::show_question::{AnswerDetail, load_answer_detail};
use crate::domain::repository::{AnswerRepository, LinkRepository, VoteRepository};
use crate::domain::value_objects::{Body, ResourceKind};
use crate::error::{QaError, QaResult};

pub struct UpdateAnswerUseCase<R>
where
    R: AnswerRepository + LinkRepository + VoteRepository,
{
    repo: Arc<R>,
    config: Arc<QaConfig>,
}

impl<R> UpdateAnswerUseCase<R>
where
    R: AnswerRepository + LinkRepository + VoteRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<QaConfig>) -> Self {
        Self { repo, config }
    }

    /// `body: None` leaves the answer as it is
    pub async fn execute(
        &self,
        actor_id: &UserId,
        answer_id: &AnswerId,
        body: Option<String>,
    ) -> QaResult<AnswerDetail> {
        let repo = self.repo.as_ref();

        let mut answer = AnswerRepository::find_by_id(repo, answer_id)
            .await?
            .ok_or(QaError::AnswerNotFound)?;

        if !answer.is_authored_by(actor_id) {
            return Err(QaError::NotAuthor(ResourceKind::Answer));
        }

        if let Some(body) = body {
            let mut errors = FieldErrors::new();
            let body = check(
                &mut errors,
                "body",
                Body::parse(body, self.config.body_max_len),
            );
            errors.into_result()?;

            if let Some(body) = body {
                answer.edit(body);
                AnswerRepository::update(repo, &answer).await?;
                tracing::info!(answer_id = %answer_id, "Answer updated");
            }
        }

        load_answer_detail(repo, answer).await
    }
}
