//! Driving port for ticket use-cases.
//!
//! Inbound adapters call this port with an authenticated [`Actor`] and
//! already-validated domain values. Every method enforces the authorisation
//! policy and writes the matching audit entry itself.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Ticket, TicketChanges, TicketDraft, TicketId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketWorkflow: Send + Sync {
    async fn create(&self, actor: &Actor, draft: TicketDraft) -> Result<Ticket, Error>;

    /// Tickets visible to `actor`, newest first.
    async fn list(&self, actor: &Actor) -> Result<Vec<Ticket>, Error>;

    async fn get(&self, actor: &Actor, id: &TicketId) -> Result<Ticket, Error>;

    async fn update(
        &self,
        actor: &Actor,
        id: &TicketId,
        changes: TicketChanges,
    ) -> Result<Ticket, Error>;

    async fn delete(&self, actor: &Actor, id: &TicketId) -> Result<(), Error>;

    async fn assign(&self, actor: &Actor, id: &TicketId, assignee: &UserId)
    -> Result<Ticket, Error>;

    async fn reopen(&self, actor: &Actor, id: &TicketId) -> Result<Ticket, Error>;
}
