//! Create Question Use Case

use std::sync::Arc;

use kernel::error::field::FieldErrors;
use kernel::id::{QuestionId, UserId};

use crate::application::config::QaConfig;
use crate::application::input::{LinkInput, RewardInput, build_links, build_reward, check};
use crate::application::show_question::QuestionDetail;
use crate::domain::entities::{NewQuestion, Question, Subscription};
use crate::domain::repository::QuestionRepository;
use crate::domain::value_objects::{Body, ResourceRef, Title};
use crate::error::{QaError, QaResult};

pub struct CreateQuestionInput {
    pub title: String,
    pub body: String,
    pub links: Vec<LinkInput>,
    pub reward: Option<RewardInput>,
}

pub struct CreateQuestionUseCase<R>
where
    R: QuestionRepository,
{
    repo: Arc<R>,
    config: Arc<QaConfig>,
}

impl<R> CreateQuestionUseCase<R>
where
    R: QuestionRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<QaConfig>) -> Self {
        Self { repo, config }
    }

    /// Create a question authored by `author_id`, who is subscribed to it
    pub async fn execute(
        &self,
        author_id: UserId,
        input: CreateQuestionInput,
    ) -> QaResult<QuestionDetail> {
        let mut errors = FieldErrors::new();

        let title = check(
            &mut errors,
            "title",
            Title::parse(input.title, self.config.title_max_len),
        );
        let body = check(
            &mut errors,
            "body",
            Body::parse(input.body, self.config.body_max_len),
        );

        // Links and reward point at the question id before it exists
        let question_id = QuestionId::new();
        let links = build_links(
            input.links,
            ResourceRef::Question(question_id),
            &self.config,
            &mut errors,
        );
        let reward = build_reward(input.reward, question_id, &self.config, &mut errors);

        errors.into_result()?;
        let (Some(title), Some(body)) = (title, body) else {
            return Err(QaError::Internal("Validated question input missing".into()));
        };

        let question = Question {
            question_id,
            ..Question::new(author_id, title, body)
        };
        let new_question = NewQuestion {
            author_subscription: Subscription::new(author_id, question_id),
            question,
            links,
            reward,
        };
        self.repo.create(&new_question).await?;

        tracing::info!(
            question_id = %question_id,
            author_id = %author_id,
            links = new_question.links.len(),
            reward = new_question.reward.is_some(),
            "Question created"
        );

        Ok(QuestionDetail {
            question: new_question.question,
            votes_sum: 0,
            links: new_question.links,
            reward: new_question.reward,
            answers: Vec::new(),
            subscription: Some(new_question.author_subscription),
            subscribers_count: 1,
        })
    }
}
