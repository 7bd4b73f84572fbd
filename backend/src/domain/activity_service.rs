//! Read side of the activity audit log.

use std::sync::Arc;

use async_trait::async_trait;

use super::policy::{Action, ResourceOwnership, enforce};
use super::ports::{ActivityLogRepository, ActivityQuery};
use super::repository_errors::map_activity_error;
use super::{ActivityLogEntry, Actor, Error, LogOrder, TicketId};

/// Staff-only reader implementing [`ActivityQuery`].
///
/// The ticket need not exist: entries for deleted tickets stay readable.
pub struct ActivityQueryService<A> {
    log: Arc<A>,
}

impl<A> ActivityQueryService<A> {
    pub fn new(log: Arc<A>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl<A> ActivityQuery for ActivityQueryService<A>
where
    A: ActivityLogRepository,
{
    async fn for_ticket(
        &self,
        actor: &Actor,
        ticket_id: &TicketId,
        order: LogOrder,
    ) -> Result<Vec<ActivityLogEntry>, Error> {
        enforce(actor, &ResourceOwnership::none(), &Action::ViewActivity)?;
        self.log
            .list_for_ticket(ticket_id, order)
            .await
            .map_err(map_activity_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockActivityLogRepository;
    use crate::domain::test_fixtures::actor;
    use crate::domain::{ErrorCode, Role};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn clients_are_refused_before_reading() {
        let mut log = MockActivityLogRepository::new();
        log.expect_list_for_ticket().never();
        let svc = ActivityQueryService::new(Arc::new(log));

        let err = svc
            .for_ticket(&actor(1, Role::Client), &TicketId::random(), LogOrder::default())
            .await
            .expect_err("clients cannot read activity");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), "Only admins and technicians can view activity logs");
    }

    #[rstest]
    #[case(Role::Technician)]
    #[case(Role::Admin)]
    #[tokio::test]
    async fn staff_read_in_requested_order(#[case] role: Role) {
        let mut log = MockActivityLogRepository::new();
        log.expect_list_for_ticket()
            .withf(|_, order| *order == LogOrder::OldestFirst)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let svc = ActivityQueryService::new(Arc::new(log));

        let entries = svc
            .for_ticket(&actor(2, role), &TicketId::random(), LogOrder::OldestFirst)
            .await
            .expect("staff may read");
        assert!(entries.is_empty());
    }
}
