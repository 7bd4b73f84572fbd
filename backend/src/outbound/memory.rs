//! In-memory implementation of every repository port.
//!
//! Backs the server when no `database_url` is configured and drives the
//! end-to-end HTTP tests. It mirrors the PostgreSQL adapters' contract:
//! unique emails, comment cascade on ticket deletion, and the same listing
//! orders. Data lives only as long as the process.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    ActivityLogRepository, ActivityLogRepositoryError, CommentRepository, CommentRepositoryError,
    StoredCredentials, TicketRepository, TicketRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    ActivityLogEntry, Comment, CommentId, CredentialHash, EmailAddress, LogOrder, Ticket,
    TicketId, TicketScope, User, UserId,
};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, StoredCredentials>,
    tickets: HashMap<TicketId, Ticket>,
    comments: HashMap<CommentId, Comment>,
    activity: Vec<ActivityLogEntry>,
}

/// Shared in-process store. Clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(
        &self,
        user: &User,
        password_hash: &CredentialHash,
    ) -> Result<(), UserRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|stored| stored.user.email() == user.email())
        {
            return Err(UserRepositoryError::duplicate_email(user.email().to_string()));
        }
        tables.users.insert(
            *user.id(),
            StoredCredentials {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(id).map(|stored| stored.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|stored| stored.user.email() == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().map(|s| s.user.clone()).collect();
        users.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(a.id()))
        });
        Ok(users)
    }

    async fn update_role(&self, user: &User) -> Result<bool, UserRepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(match tables.users.get_mut(user.id()) {
            Some(stored) => {
                stored.user = user.clone();
                true
            }
            None => false,
        })
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.remove(id).is_some())
    }
}

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        let mut tables = self.tables.write().await;
        tables.tickets.insert(*ticket.id(), ticket.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, TicketRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.tickets.get(id).cloned())
    }

    async fn update(&self, ticket: &Ticket) -> Result<bool, TicketRepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(match tables.tickets.get_mut(ticket.id()) {
            Some(stored) => {
                *stored = ticket.clone();
                true
            }
            None => false,
        })
    }

    async fn delete(&self, id: &TicketId) -> Result<bool, TicketRepositoryError> {
        let mut tables = self.tables.write().await;
        let removed = tables.tickets.remove(id).is_some();
        if removed {
            tables.comments.retain(|_, comment| comment.ticket_id() != id);
        }
        Ok(removed)
    }

    async fn list(&self, scope: &TicketScope) -> Result<Vec<Ticket>, TicketRepositoryError> {
        let tables = self.tables.read().await;
        let mut tickets: Vec<Ticket> = tables
            .tickets
            .values()
            .filter(|t| scope.admits(t.created_by(), t.assigned_to()))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(a.id()))
        });
        Ok(tickets)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut tables = self.tables.write().await;
        tables.comments.insert(*comment.id(), comment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.get(id).cloned())
    }

    async fn update(&self, comment: &Comment) -> Result<bool, CommentRepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(match tables.comments.get_mut(comment.id()) {
            Some(stored) => {
                *stored = comment.clone();
                true
            }
            None => false,
        })
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, CommentRepositoryError> {
        let mut tables = self.tables.write().await;
        Ok(tables.comments.remove(id).is_some())
    }

    async fn list_for_ticket(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.ticket_id() == ticket_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(comments)
    }
}

#[async_trait]
impl ActivityLogRepository for InMemoryStore {
    async fn append(&self, entry: &ActivityLogEntry) -> Result<(), ActivityLogRepositoryError> {
        let mut tables = self.tables.write().await;
        tables.activity.push(entry.clone());
        Ok(())
    }

    async fn list_for_ticket(
        &self,
        ticket_id: &TicketId,
        order: LogOrder,
    ) -> Result<Vec<ActivityLogEntry>, ActivityLogRepositoryError> {
        let tables = self.tables.read().await;
        // Stable sort keeps append order among equal timestamps.
        let mut entries: Vec<ActivityLogEntry> = tables
            .activity
            .iter()
            .filter(|e| e.ticket_id() == Some(ticket_id))
            .cloned()
            .collect();
        entries.sort_by_key(ActivityLogEntry::created_at);
        if order == LogOrder::NewestFirst {
            entries.reverse();
        }
        Ok(entries)
    }
}
