//! Driving port for reading the audit log.

use async_trait::async_trait;

use crate::domain::{ActivityLogEntry, Actor, Error, LogOrder, TicketId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityQuery: Send + Sync {
    async fn for_ticket(
        &self,
        actor: &Actor,
        ticket_id: &TicketId,
        order: LogOrder,
    ) -> Result<Vec<ActivityLogEntry>, Error>;
}
