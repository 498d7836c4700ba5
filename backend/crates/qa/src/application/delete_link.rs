//! Delete Link Use Case

use std::sync::Arc;

use kernel::id::{LinkId, UserId};

use crate::application::ownership::author_of;
use crate::domain::repository::{AnswerRepository, LinkRepository, QuestionRepository};
use crate::error::{QaError, QaResult};

pub struct DeleteLinkUseCase<R>
where
    R: QuestionRepository + AnswerRepository + LinkRepository,
{
    repo: Arc<R>,
}

impl<R> DeleteLinkUseCase<R>
where
    R: QuestionRepository + AnswerRepository + LinkRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Only the author of the linked question or answer may remove a link
    pub async fn execute(&self, actor_id: &UserId, link_id: &LinkId) -> QaResult<()> {
        let repo = self.repo.as_ref();

        let link = LinkRepository::find_by_id(repo, link_id)
            .await?
            .ok_or(QaError::LinkNotFound)?;

        if author_of(repo, &link.linkable).await? != *actor_id {
            return Err(QaError::NotAuthor(link.linkable.kind()));
        }

        LinkRepository::delete(repo, link_id).await?;

        tracing::info!(link_id = %link_id, "Link deleted");
        Ok(())
    }
}
