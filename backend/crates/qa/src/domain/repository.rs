//! Repository Traits
//!
//! Persistence interfaces for the Q&A domain. Every method is one
//! transaction; cascades happen inside the delete that triggers them.

use kernel::id::{AnswerId, LinkId, QuestionId, SubscriptionId, UserId, VoteId};

use crate::domain::entities::{
    Answer, Link, NewQuestion, Question, QuestionSummary, Reward, Subscription, Vote,
};
use crate::domain::value_objects::ResourceRef;
use crate::error::QaResult;

#[trait_variant::make(QuestionRepository: Send)]
pub trait LocalQuestionRepository {
    /// Store the question with its links, reward and author subscription
    async fn create(&self, new_question: &NewQuestion) -> QaResult<()>;

    async fn find_by_id(&self, question_id: &QuestionId) -> QaResult<Option<Question>>;

    /// Newest first
    async fn list(&self) -> QaResult<Vec<QuestionSummary>>;

    async fn update(&self, question: &Question) -> QaResult<()>;

    /// Remove the question, its answers, links and votes (of the question and
    /// of its answers), reward and subscriptions
    async fn delete(&self, question_id: &QuestionId) -> QaResult<()>;
}

#[trait_variant::make(AnswerRepository: Send)]
pub trait LocalAnswerRepository {
    async fn create(&self, answer: &Answer, links: &[Link]) -> QaResult<()>;

    async fn find_by_id(&self, answer_id: &AnswerId) -> QaResult<Option<Answer>>;

    /// Best answer first, then oldest first
    async fn list_by_question(&self, question_id: &QuestionId) -> QaResult<Vec<Answer>>;

    async fn update(&self, answer: &Answer) -> QaResult<()>;

    /// Remove the answer with its links and votes
    async fn delete(&self, answer_id: &AnswerId) -> QaResult<()>;

    /// Make `answer` the only best answer of its question and store the
    /// reward's new recipient, if any
    async fn mark_best(&self, answer: &Answer, reward: Option<&Reward>) -> QaResult<()>;
}

#[trait_variant::make(LinkRepository: Send)]
pub trait LocalLinkRepository {
    async fn list_for(&self, linkable: &ResourceRef) -> QaResult<Vec<Link>>;

    async fn find_by_id(&self, link_id: &LinkId) -> QaResult<Option<Link>>;

    async fn delete(&self, link_id: &LinkId) -> QaResult<()>;
}

#[trait_variant::make(VoteRepository: Send)]
pub trait LocalVoteRepository {
    async fn find_by_user(&self, votable: &ResourceRef, user_id: &UserId)
    -> QaResult<Option<Vote>>;

    async fn create(&self, vote: &Vote) -> QaResult<()>;

    async fn delete(&self, vote_id: &VoteId) -> QaResult<()>;

    /// Sum of vote values; 0 without votes
    async fn sum_for(&self, votable: &ResourceRef) -> QaResult<i64>;
}

#[trait_variant::make(RewardRepository: Send)]
pub trait LocalRewardRepository {
    async fn find_by_question(&self, question_id: &QuestionId) -> QaResult<Option<Reward>>;

    async fn list_by_recipient(&self, user_id: &UserId) -> QaResult<Vec<Reward>>;
}

#[trait_variant::make(SubscriptionRepository: Send)]
pub trait LocalSubscriptionRepository {
    async fn create(&self, subscription: &Subscription) -> QaResult<()>;

    async fn find_by_id(&self, subscription_id: &SubscriptionId)
    -> QaResult<Option<Subscription>>;

    async fn find_by_user_and_question(
        &self,
        user_id: &UserId,
        question_id: &QuestionId,
    ) -> QaResult<Option<Subscription>>;

    async fn delete(&self, subscription_id: &SubscriptionId) -> QaResult<()>;

    async fn list_by_question(&self, question_id: &QuestionId) -> QaResult<Vec<Subscription>>;
}

/// Everything the Q&A HTTP layer needs from one store
pub trait QaStore:
    QuestionRepository
    + AnswerRepository
    + LinkRepository
    + VoteRepository
    + RewardRepository
    + SubscriptionRepository
    + Send
    + Sync
    + 'static
{
}

impl<T> QaStore for T where
    T: QuestionRepository
        + AnswerRepository
        + LinkRepository
        + VoteRepository
        + RewardRepository
        + SubscriptionRepository
        + Send
        + Sync
        + 'static
{
}
