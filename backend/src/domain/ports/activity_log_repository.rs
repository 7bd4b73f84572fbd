//! Append-only port for the activity audit log.
//!
//! There is deliberately no update or delete operation.
use async_trait::async_trait;

use crate::domain::{ActivityLogEntry, LogOrder, TicketId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by activity log adapters.
    pub enum ActivityLogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "activity log connection failed: {message}",
        /// Query or append failed during execution.
        Query { message: String } => "activity log query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    async fn append(&self, entry: &ActivityLogEntry) -> Result<(), ActivityLogRepositoryError>;

    async fn list_for_ticket(
        &self,
        ticket_id: &TicketId,
        order: LogOrder,
    ) -> Result<Vec<ActivityLogEntry>, ActivityLogRepositoryError>;
}
