//! Comment use-cases.
//!
//! Any authenticated user may comment on or read the comments of an existing
//! ticket. A comment may be edited or deleted by its author or an admin.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use super::audit::AuditTrail;
use super::policy::{Action, ResourceOwnership, enforce};
use super::ports::{ActivityLogRepository, CommentRepository, CommentWorkflow, TicketRepository};
use super::repository_errors::{map_comment_error, map_ticket_error};
use super::{
    ActivityAction, ActivityRecord, Actor, Comment, CommentContent, CommentId, Error, TicketId,
};

/// Comment service implementing the [`CommentWorkflow`] driving port.
pub struct CommentService<C, T, A> {
    comments: Arc<C>,
    tickets: Arc<T>,
    audit: AuditTrail<A>,
    clock: Arc<dyn Clock>,
}

impl<C, T, A> CommentService<C, T, A>
where
    C: CommentRepository,
    T: TicketRepository,
    A: ActivityLogRepository,
{
    pub fn new(
        comments: Arc<C>,
        tickets: Arc<T>,
        audit: AuditTrail<A>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            comments,
            tickets,
            audit,
            clock,
        }
    }

    async fn ensure_ticket_exists(&self, id: &TicketId) -> Result<(), Error> {
        match self.tickets.find_by_id(id).await.map_err(map_ticket_error)? {
            Some(_) => Ok(()),
            None => Err(Error::not_found("Ticket not found")),
        }
    }

    async fn load(&self, id: &CommentId) -> Result<Comment, Error> {
        self.comments
            .find_by_id(id)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(|| Error::not_found("Comment not found"))
    }
}

#[async_trait]
impl<C, T, A> CommentWorkflow for CommentService<C, T, A>
where
    C: CommentRepository,
    T: TicketRepository,
    A: ActivityLogRepository,
{
    async fn add(
        &self,
        actor: &Actor,
        ticket_id: &TicketId,
        content: CommentContent,
    ) -> Result<Comment, Error> {
        self.ensure_ticket_exists(ticket_id).await?;

        let comment = Comment::post(
            CommentId::random(),
            *ticket_id,
            *actor.id(),
            content,
            self.clock.utc(),
        );
        self.comments
            .insert(&comment)
            .await
            .map_err(map_comment_error)?;
        info!(comment_id = %comment.id(), %ticket_id, "comment added");

        self.audit
            .record(ActivityRecord::for_ticket(
                *ticket_id,
                ActivityAction::CommentAdded,
                *actor.id(),
                json!({ "commentId": comment.id() }),
            ))
            .await?;
        Ok(comment)
    }

    async fn list_for_ticket(
        &self,
        _actor: &Actor,
        ticket_id: &TicketId,
    ) -> Result<Vec<Comment>, Error> {
        self.ensure_ticket_exists(ticket_id).await?;
        self.comments
            .list_for_ticket(ticket_id)
            .await
            .map_err(map_comment_error)
    }

    async fn edit(
        &self,
        actor: &Actor,
        id: &CommentId,
        content: CommentContent,
    ) -> Result<Comment, Error> {
        let mut comment = self.load(id).await?;
        enforce(
            actor,
            &ResourceOwnership::owned_by(comment.author()),
            &Action::EditComment,
        )?;

        let previous = comment.edit(content, self.clock.utc());
        if !self
            .comments
            .update(&comment)
            .await
            .map_err(map_comment_error)?
        {
            return Err(Error::not_found("Comment not found"));
        }
        info!(comment_id = %id, "comment edited");

        self.audit
            .record(ActivityRecord::for_ticket(
                *comment.ticket_id(),
                ActivityAction::CommentEdited,
                *actor.id(),
                json!({
                    "commentId": id,
                    "from": previous.as_ref(),
                    "to": comment.content().as_ref(),
                }),
            ))
            .await?;
        Ok(comment)
    }

    async fn remove(&self, actor: &Actor, id: &CommentId) -> Result<(), Error> {
        let comment = self.load(id).await?;
        enforce(
            actor,
            &ResourceOwnership::owned_by(comment.author()),
            &Action::DeleteComment,
        )?;

        if !self.comments.delete(id).await.map_err(map_comment_error)? {
            return Err(Error::not_found("Comment not found"));
        }
        info!(comment_id = %id, "comment deleted");

        self.audit
            .record(ActivityRecord::for_ticket(
                *comment.ticket_id(),
                ActivityAction::CommentDeleted,
                *actor.id(),
                json!({ "commentId": id }),
            ))
            .await?;
        Ok(())
    }
}
