//! Port abstraction for ticket persistence.
use async_trait::async_trait;

use crate::domain::{Ticket, TicketId, TicketScope};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by ticket repository adapters.
    pub enum TicketRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "ticket repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ticket repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError>;

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Overwrite every mutable field. Last writer wins.
    ///
    /// Returns `false` when the ticket no longer exists.
    async fn update(&self, ticket: &Ticket) -> Result<bool, TicketRepositoryError>;

    /// Remove a ticket and its comments. Returns `false` when nothing was
    /// deleted.
    async fn delete(&self, id: &TicketId) -> Result<bool, TicketRepositoryError>;

    /// Tickets inside `scope`, newest first.
    async fn list(&self, scope: &TicketScope) -> Result<Vec<Ticket>, TicketRepositoryError>;
}
