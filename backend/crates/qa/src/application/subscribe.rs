//! Subscribe Use Case

use std::sync::Arc;

use kernel::id::{QuestionId, UserId};

use crate::domain::entities::Subscription;
use crate::domain::repository::{QuestionRepository, SubscriptionRepository};
use crate::error::{QaError, QaResult};

pub struct SubscribeUseCase<R>
where
    R: QuestionRepository + SubscriptionRepository,
{
    repo: Arc<R>,
}

impl<R> SubscribeUseCase<R>
where
    R: QuestionRepository + SubscriptionRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user_id: UserId, question_id: QuestionId) -> QaResult<Subscription> {
        let repo = self.repo.as_ref();

        QuestionRepository::find_by_id(repo, &question_id)
            .await?
            .ok_or(QaError::QuestionNotFound)?;

        if repo
            .find_by_user_and_question(&user_id, &question_id)
            .await?
            .is_some()
        {
            return Err(QaError::AlreadySubscribed);
        }

        let subscription = Subscription::new(user_id, question_id);
        SubscriptionRepository::create(repo, &subscription).await?;

        tracing::info!(
            subscription_id = %subscription.subscription_id,
            question_id = %question_id,
            "Subscribed to question"
        );
        Ok(subscription)
    }
}
