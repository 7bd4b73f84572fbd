//! Port abstraction for comment persistence.
use async_trait::async_trait;

use crate::domain::{Comment, CommentId, TicketId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError>;

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Persist edited content. Returns `false` when the comment is gone.
    async fn update(&self, comment: &Comment) -> Result<bool, CommentRepositoryError>;

    async fn delete(&self, id: &CommentId) -> Result<bool, CommentRepositoryError>;

    /// Comments on a ticket, oldest first.
    async fn list_for_ticket(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<Comment>, CommentRepositoryError>;
}
