//! Comments attached to tickets.

use chrono::{DateTime, Utc};

use super::{CommentId, TicketId, UserId};

/// Validation errors for comment content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentValidationError {
    #[error("comment content must not be empty")]
    EmptyContent,
}

/// Comment body, stored trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent(String);

impl CommentContent {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CommentValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CommentValidationError::EmptyContent);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CommentContent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Free-text note on exactly one ticket, by exactly one author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id: CommentId,
    ticket_id: TicketId,
    author: UserId,
    content: CommentContent,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Owned parts used to restore a persisted [`Comment`].
#[derive(Debug, Clone)]
pub struct CommentParts {
    pub id: CommentId,
    pub ticket_id: TicketId,
    pub author: UserId,
    pub content: CommentContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn post(
        id: CommentId,
        ticket_id: TicketId,
        author: UserId,
        content: CommentContent,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            ticket_id,
            author,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn restore(parts: CommentParts) -> Self {
        let CommentParts {
            id,
            ticket_id,
            author,
            content,
            created_at,
            updated_at,
        } = parts;
        Self {
            id,
            ticket_id,
            author,
            content,
            created_at,
            updated_at,
        }
    }

    pub const fn id(&self) -> &CommentId {
        &self.id
    }

    pub const fn ticket_id(&self) -> &TicketId {
        &self.ticket_id
    }

    pub const fn author(&self) -> &UserId {
        &self.author
    }

    pub const fn content(&self) -> &CommentContent {
        &self.content
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the content, returning what it was.
    pub fn edit(&mut self, content: CommentContent, now: DateTime<Utc>) -> CommentContent {
        self.updated_at = now;
        std::mem::replace(&mut self.content, content)
    }
}
