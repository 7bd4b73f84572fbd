//! Driving port for comment use-cases.

use async_trait::async_trait;

use crate::domain::{Actor, Comment, CommentContent, CommentId, Error, TicketId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentWorkflow: Send + Sync {
    async fn add(
        &self,
        actor: &Actor,
        ticket_id: &TicketId,
        content: CommentContent,
    ) -> Result<Comment, Error>;

    /// Comments on a ticket, oldest first.
    async fn list_for_ticket(&self, actor: &Actor, ticket_id: &TicketId)
    -> Result<Vec<Comment>, Error>;

    async fn edit(
        &self,
        actor: &Actor,
        id: &CommentId,
        content: CommentContent,
    ) -> Result<Comment, Error>;

    async fn remove(&self, actor: &Actor, id: &CommentId) -> Result<(), Error>;
}
