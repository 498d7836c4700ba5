//! List Rewards Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entities::Reward;
use crate::domain::repository::RewardRepository;
use crate::error::QaResult;

pub struct ListRewardsUseCase<R>
where
    R: RewardRepository,
{
    repo: Arc<R>,
}

impl<R> ListRewardsUseCase<R>
where
    R: RewardRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Rewards earned by `user_id` through best answers
    pub async fn execute(&self, user_id: &UserId) -> QaResult<Vec<Reward>> {
        self.repo.list_by_recipient(user_id).await
    }
}
