//! Activity audit log entries.
//!
//! Entries are immutable facts. Nothing in this module, or in the
//! repository port that stores them, can edit or remove one.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ActivityId, TicketId, UserId};

/// Closed set of auditable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    Updated,
    Deleted,
    Assigned,
    Reopened,
    CommentAdded,
    CommentEdited,
    CommentDeleted,
    RoleUpdated,
    UserCreated,
    UserDeleted,
}

impl ActivityAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Assigned => "assigned",
            Self::Reopened => "reopened",
            Self::CommentAdded => "comment_added",
            Self::CommentEdited => "comment_edited",
            Self::CommentDeleted => "comment_deleted",
            Self::RoleUpdated => "role_updated",
            Self::UserCreated => "user_created",
            Self::UserDeleted => "user_deleted",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when stored text does not name a known action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown activity action: {value}")]
pub struct UnknownActivityAction {
    pub value: String,
}

impl FromStr for ActivityAction {
    type Err = UnknownActivityAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s {
            "created" => Self::Created,
            "updated" => Self::Updated,
            "deleted" => Self::Deleted,
            "assigned" => Self::Assigned,
            "reopened" => Self::Reopened,
            "comment_added" => Self::CommentAdded,
            "comment_edited" => Self::CommentEdited,
            "comment_deleted" => Self::CommentDeleted,
            "role_updated" => Self::RoleUpdated,
            "user_created" => Self::UserCreated,
            "user_deleted" => Self::UserDeleted,
            other => {
                return Err(UnknownActivityAction {
                    value: other.to_owned(),
                });
            }
        };
        Ok(action)
    }
}

/// An audit fact waiting to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub ticket_id: Option<TicketId>,
    pub action: ActivityAction,
    pub performed_by: UserId,
    pub metadata: Value,
}

impl ActivityRecord {
    /// Record scoped to a ticket.
    pub fn for_ticket(
        ticket_id: TicketId,
        action: ActivityAction,
        performed_by: UserId,
        metadata: Value,
    ) -> Self {
        Self {
            ticket_id: Some(ticket_id),
            action,
            performed_by,
            metadata,
        }
    }

    /// Record with no ticket, e.g. account administration.
    pub fn unscoped(action: ActivityAction, performed_by: UserId, metadata: Value) -> Self {
        Self {
            ticket_id: None,
            action,
            performed_by,
            metadata,
        }
    }
}

/// Appended audit entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityLogEntry {
    id: ActivityId,
    ticket_id: Option<TicketId>,
    action: ActivityAction,
    performed_by: UserId,
    metadata: Value,
    created_at: DateTime<Utc>,
}

impl ActivityLogEntry {
    pub fn new(id: ActivityId, record: ActivityRecord, created_at: DateTime<Utc>) -> Self {
        let ActivityRecord {
            ticket_id,
            action,
            performed_by,
            metadata,
        } = record;
        Self {
            id,
            ticket_id,
            action,
            performed_by,
            metadata,
            created_at,
        }
    }

    pub const fn id(&self) -> &ActivityId {
        &self.id
    }

    pub const fn ticket_id(&self) -> Option<&TicketId> {
        self.ticket_id.as_ref()
    }

    pub const fn action(&self) -> ActivityAction {
        self.action
    }

    pub const fn performed_by(&self) -> &UserId {
        &self.performed_by
    }

    pub const fn metadata(&self) -> &Value {
        &self.metadata
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Read ordering for a ticket's activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogOrder {
    /// Newest entry first.
    #[default]
    #[serde(rename = "desc")]
    NewestFirst,
    /// Chronological.
    #[serde(rename = "asc")]
    OldestFirst,
}
