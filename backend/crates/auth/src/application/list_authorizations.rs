//! List the external identities linked to a user

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::authorization::Authorization;
use crate::domain::repository::AuthorizationRepository;
use crate::error::AuthResult;

pub struct ListAuthorizationsUseCase<A>
where
    A: AuthorizationRepository,
{
    authorization_repo: Arc<A>,
}

impl<A> ListAuthorizationsUseCase<A>
where
    A: AuthorizationRepository,
{
    pub fn new(authorization_repo: Arc<A>) -> Self {
        Self { authorization_repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<Vec<Authorization>> {
        self.authorization_repo.list_by_user(user_id).await
    }
}
