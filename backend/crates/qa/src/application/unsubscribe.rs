//! Unsubscribe Use Case

use std::sync::Arc;

use kernel::id::{SubscriptionId, UserId};

use crate::domain::repository::SubscriptionRepository;
use crate::error::{QaError, QaResult};

pub struct UnsubscribeUseCase<R>
where
    R: SubscriptionRepository,
{
    repo: Arc<R>,
}

impl<R> UnsubscribeUseCase<R>
where
    R: SubscriptionRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, actor_id: &UserId, subscription_id: &SubscriptionId) -> QaResult<()> {
        let subscription = self
            .repo
            .find_by_id(subscription_id)
            .await?
            .ok_or(QaError::SubscriptionNotFound)?;

        if subscription.user_id != *actor_id {
            return Err(QaError::NotSubscriber);
        }

        self.repo.delete(subscription_id).await?;

        tracing::info!(
            subscription_id = %subscription_id,
            question_id = %subscription.question_id,
            "Unsubscribed from question"
        );
        Ok(())
    }
}
