//! Show Question Use Case
//!
//! Loads a question with everything its page shows.

use std::sync::Arc;

use kernel::id::{QuestionId, UserId};

use crate::domain::entities::{Answer, Link, Question, Reward, Subscription};
use crate::domain::repository::{
    AnswerRepository, LinkRepository, QuestionRepository, RewardRepository,
    SubscriptionRepository, VoteRepository,
};
use crate::domain::value_objects::ResourceRef;
use crate::error::{QaError, QaResult};

#[derive(Debug, Clone)]
pub struct AnswerDetail {
    pub answer: Answer,
    pub votes_sum: i64,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone)]
pub struct QuestionDetail {
    pub question: Question,
    pub votes_sum: i64,
    pub links: Vec<Link>,
    pub reward: Option<Reward>,
    /// Best answer first
    pub answers: Vec<AnswerDetail>,
    /// The viewer's subscription, if signed in and subscribed
    pub subscription: Option<Subscription>,
    pub subscribers_count: usize,
}

pub(crate) async fn load_answer_detail<R>(repo: &R, answer: Answer) -> QaResult<AnswerDetail>
where
    R: LinkRepository + VoteRepository,
{
    let target = ResourceRef::Answer(answer.answer_id);
    Ok(AnswerDetail {
        votes_sum: repo.sum_for(&target).await?,
        links: repo.list_for(&target).await?,
        answer,
    })
}

pub struct ShowQuestionUseCase<R>
where
    R: QuestionRepository
        + AnswerRepository
        + LinkRepository
        + VoteRepository
        + RewardRepository
        + SubscriptionRepository,
{
    repo: Arc<R>,
}

impl<R> ShowQuestionUseCase<R>
where
    R: QuestionRepository
        + AnswerRepository
        + LinkRepository
        + VoteRepository
        + RewardRepository
        + SubscriptionRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        question_id: &QuestionId,
        viewer: Option<&UserId>,
    ) -> QaResult<QuestionDetail> {
        let repo = self.repo.as_ref();

        let question = QuestionRepository::find_by_id(repo, question_id)
            .await?
            .ok_or(QaError::QuestionNotFound)?;
        let target = ResourceRef::Question(*question_id);

        let mut answers = Vec::new();
        for answer in AnswerRepository::list_by_question(repo, question_id).await? {
            answers.push(load_answer_detail(repo, answer).await?);
        }

        let subscription = match viewer {
            Some(user_id) => repo.find_by_user_and_question(user_id, question_id).await?,
            None => None,
        };
        let subscribers_count = SubscriptionRepository::list_by_question(repo, question_id)
            .await?
            .len();

        Ok(QuestionDetail {
            votes_sum: repo.sum_for(&target).await?,
            links: repo.list_for(&target).await?,
            reward: repo.find_by_question(question_id).await?,
            answers,
            subscription,
            subscribers_count,
            question,
        })
    }
}
