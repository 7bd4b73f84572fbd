//! Ticket use-cases.
//!
//! Implements [`TicketWorkflow`] on top of the ticket and user repositories.
//! Checks run in a fixed order: the ticket must exist, then the policy must
//! allow the action, then any referenced user must exist. Only then is the
//! mutation persisted and its audit entry appended.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use super::audit::AuditTrail;
use super::policy::{Action, ResourceOwnership, TicketScope, enforce};
use super::ports::{ActivityLogRepository, TicketRepository, TicketWorkflow, UserRepository};
use super::repository_errors::{map_ticket_error, map_user_error};
use super::{
    ActivityAction, ActivityRecord, Actor, Error, Ticket, TicketChanges, TicketDraft, TicketId,
    UserId,
};

/// Ticket service implementing the [`TicketWorkflow`] driving port.
pub struct TicketService<T, U, A> {
    tickets: Arc<T>,
    users: Arc<U>,
    audit: AuditTrail<A>,
    clock: Arc<dyn Clock>,
    audit_updates: bool,
}

impl<T, U, A> TicketService<T, U, A>
where
    A: ActivityLogRepository,
{
    pub fn new(
        tickets: Arc<T>,
        users: Arc<U>,
        audit: AuditTrail<A>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tickets,
            users,
            audit,
            clock,
            audit_updates: true,
        }
    }

    /// Toggle the `updated` audit entry written by field edits.
    #[must_use]
    pub fn with_update_auditing(mut self, enabled: bool) -> Self {
        self.audit_updates = enabled;
        self
    }
}

impl<T, U, A> TicketService<T, U, A>
where
    T: TicketRepository,
    U: UserRepository,
    A: ActivityLogRepository,
{
    async fn load(&self, id: &TicketId) -> Result<Ticket, Error> {
        self.tickets
            .find_by_id(id)
            .await
            .map_err(map_ticket_error)?
            .ok_or_else(|| Error::not_found("Ticket not found"))
    }

    async fn ensure_user_exists(&self, id: &UserId, message: &str) -> Result<(), Error> {
        match self.users.find_by_id(id).await.map_err(map_user_error)? {
            Some(_) => Ok(()),
            None => Err(Error::not_found(message)),
        }
    }

    async fn persist(&self, ticket: &Ticket) -> Result<(), Error> {
        if self.tickets.update(ticket).await.map_err(map_ticket_error)? {
            Ok(())
        } else {
            Err(Error::not_found("Ticket not found"))
        }
    }
}

#[async_trait]
impl<T, U, A> TicketWorkflow for TicketService<T, U, A>
where
    T: TicketRepository,
    U: UserRepository,
    A: ActivityLogRepository,
{
    async fn create(&self, actor: &Actor, draft: TicketDraft) -> Result<Ticket, Error> {
        if let Some(assignee) = draft.assigned_to.as_ref() {
            enforce(
                actor,
                &ResourceOwnership::owned_by(actor.id()),
                &Action::AssignTicket { assignee },
            )?;
            self.ensure_user_exists(assignee, "Assigned user not found")
                .await?;
        }

        let ticket = Ticket::open(TicketId::random(), draft, *actor.id(), self.clock.utc());
        self.tickets
            .insert(&ticket)
            .await
            .map_err(map_ticket_error)?;
        info!(ticket_id = %ticket.id(), actor_id = %actor.id(), "ticket created");

        self.audit
            .record(ActivityRecord::for_ticket(
                *ticket.id(),
                ActivityAction::Created,
                *actor.id(),
                json!({
                    "title": ticket.title().as_ref(),
                    "priority": ticket.priority(),
                    "status": ticket.status(),
                    "assignedTo": ticket.assigned_to(),
                }),
            ))
            .await?;
        Ok(ticket)
    }

    async fn list(&self, actor: &Actor) -> Result<Vec<Ticket>, Error> {
        self.tickets
            .list(&TicketScope::for_actor(actor))
            .await
            .map_err(map_ticket_error)
    }

    async fn get(&self, actor: &Actor, id: &TicketId) -> Result<Ticket, Error> {
        let ticket = self.load(id).await?;
        enforce(
            actor,
            &ResourceOwnership::ticket(ticket.created_by(), ticket.assigned_to()),
            &Action::ViewTicket,
        )?;
        Ok(ticket)
    }

    async fn update(
        &self,
        actor: &Actor,
        id: &TicketId,
        changes: TicketChanges,
    ) -> Result<Ticket, Error> {
        let mut ticket = self.load(id).await?;
        enforce(
            actor,
            &ResourceOwnership::ticket(ticket.created_by(), ticket.assigned_to()),
            &Action::UpdateTicket,
        )?;

        let change_set = ticket.apply_changes(changes, self.clock.utc());
        if change_set.is_empty() {
            return Ok(ticket);
        }
        self.persist(&ticket).await?;
        info!(
            ticket_id = %ticket.id(),
            actor_id = %actor.id(),
            fields = ?change_set.fields().map(|change| change.field).collect::<Vec<_>>(),
            "ticket updated"
        );

        if self.audit_updates {
            self.audit
                .record(ActivityRecord::for_ticket(
                    *ticket.id(),
                    ActivityAction::Updated,
                    *actor.id(),
                    change_set.to_metadata(),
                ))
                .await?;
        }
        Ok(ticket)
    }

    async fn delete(&self, actor: &Actor, id: &TicketId) -> Result<(), Error> {
        let ticket = self.load(id).await?;
        enforce(
            actor,
            &ResourceOwnership::ticket(ticket.created_by(), ticket.assigned_to()),
            &Action::DeleteTicket,
        )?;

        if !self.tickets.delete(id).await.map_err(map_ticket_error)? {
            return Err(Error::not_found("Ticket not found"));
        }
        info!(ticket_id = %id, actor_id = %actor.id(), "ticket deleted");

        self.audit
            .record(ActivityRecord::for_ticket(
                *id,
                ActivityAction::Deleted,
                *actor.id(),
                json!({
                    "title": ticket.title().as_ref(),
                    "status": ticket.status(),
                }),
            ))
            .await?;
        Ok(())
    }

    async fn assign(
        &self,
        actor: &Actor,
        id: &TicketId,
        assignee: &UserId,
    ) -> Result<Ticket, Error> {
        let mut ticket = self.load(id).await?;
        self.ensure_user_exists(assignee, "User to assign not found")
            .await?;
        enforce(
            actor,
            &ResourceOwnership::ticket(ticket.created_by(), ticket.assigned_to()),
            &Action::AssignTicket { assignee },
        )?;

        let outcome = ticket.assign(*assignee, self.clock.utc());
        self.persist(&ticket).await?;
        info!(
            ticket_id = %id,
            actor_id = %actor.id(),
            assignee = %assignee,
            "ticket assigned"
        );

        self.audit
            .record(ActivityRecord::for_ticket(
                *id,
                ActivityAction::Assigned,
                *actor.id(),
                json!({
                    "assignedTo": assignee,
                    "previousAssignee": outcome.previous_assignee,
                    "previousStatus": outcome.previous_status,
                    "status": ticket.status(),
                }),
            ))
            .await?;
        Ok(ticket)
    }

    async fn reopen(&self, actor: &Actor, id: &TicketId) -> Result<Ticket, Error> {
        let mut ticket = self.load(id).await?;
        enforce(
            actor,
            &ResourceOwnership::ticket(ticket.created_by(), ticket.assigned_to()),
            &Action::ReopenTicket,
        )?;

        let previous = ticket
            .reopen(self.clock.utc())
            .map_err(|err| Error::conflict("Ticket is already reopened").with_details(
                json!({ "code": "already_reopened", "reason": err.to_string() }),
            ))?;
        self.persist(&ticket).await?;
        info!(ticket_id = %id, actor_id = %actor.id(), "ticket reopened");

        self.audit
            .record(ActivityRecord::for_ticket(
                *id,
                ActivityAction::Reopened,
                *actor.id(),
                json!({ "from": previous, "status": ticket.status() }),
            ))
            .await?;
        Ok(ticket)
    }
}

#[cfg(test)]
#[path = "ticket_service_tests.rs"]
mod tests;
