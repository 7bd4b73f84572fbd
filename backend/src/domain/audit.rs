//! Audit trail protocol.
//!
//! Every mutating use-case runs two explicit steps: persist the mutation,
//! then call [`AuditTrail::record`]. The two writes are not atomic. When the
//! append fails after the mutation committed, the change stays in place,
//! the gap is logged at `error` with `audit_gap = true`, and the operation
//! reports an internal error.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, error};

use super::ports::ActivityLogRepository;
use super::{ActivityId, ActivityLogEntry, ActivityRecord, Error};

/// Append-only writer over an [`ActivityLogRepository`].
pub struct AuditTrail<A> {
    log: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<A> Clone for AuditTrail<A> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<A> AuditTrail<A>
where
    A: ActivityLogRepository,
{
    pub fn new(log: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self { log, clock }
    }

    /// Append one entry for a mutation that has already been persisted.
    pub async fn record(&self, record: ActivityRecord) -> Result<ActivityLogEntry, Error> {
        let entry = ActivityLogEntry::new(ActivityId::random(), record, self.clock.utc());
        match self.log.append(&entry).await {
            Ok(()) => {
                debug!(
                    entry_id = %entry.id(),
                    action = %entry.action(),
                    "activity recorded"
                );
                Ok(entry)
            }
            Err(err) => {
                error!(
                    audit_gap = true,
                    action = %entry.action(),
                    ticket_id = ?entry.ticket_id().map(ToString::to_string),
                    performed_by = %entry.performed_by(),
                    error = %err,
                    "mutation committed but its audit entry was not written"
                );
                Err(Error::internal(format!("failed to record activity: {err}")))
            }
        }
    }
}
