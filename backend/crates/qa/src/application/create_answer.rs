//! Create Answer Use Case

use std::sync::Arc;

use kernel::error::field::FieldErrors;
use kernel::id::{AnswerId, QuestionId, UserId};

use crate::application::config::QaConfig;
use crate::application::input::{LinkInput, build_links, check};
use crate::application::show_question::AnswerDetail;
use crate::domain::entities::Answer;
use crate::domain::repository::{AnswerRepository, QuestionRepository};
use crate::domain::value_objects::{Body, ResourceRef};
use crate::error::{QaError, QaResult};

pub struct CreateAnswerInput {
    pub body: String,
    pub links: Vec<LinkInput>,
}

pub struct CreateAnswerUseCase<R>
where
    R: QuestionRepository + AnswerRepository,
{
    repo: Arc<R>,
    config: Arc<QaConfig>,
}

impl<R> CreateAnswerUseCase<R>
where
    R: QuestionRepository + AnswerRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<QaConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        author_id: UserId,
        question_id: QuestionId,
        input: CreateAnswerInput,
    ) -> QaResult<AnswerDetail> {
        let repo = self.repo.as_ref();

        QuestionRepository::find_by_id(repo, &question_id)
            .await?
            .ok_or(QaError::QuestionNotFound)?;

        let mut errors = FieldErrors::new();
        let body = check(
            &mut errors,
            "body",
            Body::parse(input.body, self.config.body_max_len),
        );
        let answer_id = AnswerId::new();
        let links = build_links(
            input.links,
            ResourceRef::Answer(answer_id),
            &self.config,
            &mut errors,
        );
        errors.into_result()?;
        let Some(body) = body else {
            return Err(QaError::Internal("Validated answer body missing".into()));
        };

        let answer = Answer {
            answer_id,
            ..Answer::new(question_id, author_id, body)
        };
        AnswerRepository::create(repo, &answer, &links).await?;

        tracing::info!(
            answer_id = %answer_id,
            question_id = %question_id,
            author_id = %author_id,
            "Answer created"
        );

        Ok(AnswerDetail {
            answer,
            votes_sum: 0,
            links,
        })
    }
}
