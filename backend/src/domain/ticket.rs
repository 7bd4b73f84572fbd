//! Tickets and their state machine.
//!
//! A ticket's creator is fixed at construction: no method on [`Ticket`]
//! writes `created_by` after [`Ticket::open`] or [`Ticket::restore`].
//! Mutations return a description of what changed so callers can build the
//! matching audit entry.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::{TicketId, UserId};

/// Validation errors for ticket attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TicketValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("unknown priority: {value}")]
    UnknownPriority { value: String },
    #[error("unknown status: {value}")]
    UnknownStatus { value: String },
}

/// Ticket title, stored trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketTitle(String);

impl TicketTitle {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TicketValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TicketValidationError::EmptyTitle);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TicketTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ticket description, stored trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDescription(String);

impl TicketDescription {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TicketValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TicketValidationError::EmptyDescription);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TicketDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(TicketValidationError::UnknownPriority {
                value: other.to_owned(),
            }),
        }
    }
}

/// Ticket lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Closed,
    Reopened,
}

impl TicketStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
            Self::Reopened => "reopened",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "closed" => Ok(Self::Closed),
            "reopened" => Ok(Self::Reopened),
            other => Err(TicketValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Rejected state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TicketTransitionError {
    #[error("ticket is already reopened")]
    AlreadyReopened,
}

/// Validated input for opening a ticket.
#[derive(Debug, Clone)]
pub struct TicketDraft {
    pub title: TicketTitle,
    pub description: TicketDescription,
    pub priority: Option<Priority>,
    pub status: Option<TicketStatus>,
    pub assigned_to: Option<UserId>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Field edits requested by an update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TicketChanges {
    pub title: Option<TicketTitle>,
    pub description: Option<TicketDescription>,
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
}

impl TicketChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }
}

/// One field whose value actually changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub from: String,
    pub to: String,
}

/// Set of effective changes produced by [`Ticket::apply_changes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet(Vec<FieldChange>);

impl ChangeSet {
    fn record(&mut self, field: &'static str, from: &str, to: &str) {
        if from != to {
            self.0.push(FieldChange {
                field,
                from: from.to_owned(),
                to: to.to_owned(),
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldChange> {
        self.0.iter()
    }

    /// Audit metadata: `{"changes": {field: {"from": .., "to": ..}}}`.
    pub fn to_metadata(&self) -> Value {
        let changes: Map<String, Value> = self
            .0
            .iter()
            .map(|change| {
                (
                    change.field.to_owned(),
                    json!({ "from": change.from, "to": change.to }),
                )
            })
            .collect();
        json!({ "changes": changes })
    }
}

/// Outcome of [`Ticket::assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub previous_assignee: Option<UserId>,
    pub previous_status: TicketStatus,
}

/// Support ticket.
///
/// ## Invariants
/// - `created_by` never changes after construction.
/// - `title` and `description` are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    id: TicketId,
    title: TicketTitle,
    description: TicketDescription,
    priority: Priority,
    status: TicketStatus,
    created_by: UserId,
    assigned_to: Option<UserId>,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Owned parts used to restore a persisted [`Ticket`].
#[derive(Debug, Clone)]
pub struct TicketParts {
    pub id: TicketId,
    pub title: TicketTitle,
    pub description: TicketDescription,
    pub priority: Priority,
    pub status: TicketStatus,
    pub created_by: UserId,
    pub assigned_to: Option<UserId>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Open a new ticket owned by `created_by`.
    ///
    /// Priority defaults to medium and status to open unless the draft
    /// supplies them.
    pub fn open(id: TicketId, draft: TicketDraft, created_by: UserId, now: DateTime<Utc>) -> Self {
        let TicketDraft {
            title,
            description,
            priority,
            status,
            assigned_to,
            due_date,
        } = draft;
        Self {
            id,
            title,
            description,
            priority: priority.unwrap_or_default(),
            status: status.unwrap_or_default(),
            created_by,
            assigned_to,
            due_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn restore(parts: TicketParts) -> Self {
        let TicketParts {
            id,
            title,
            description,
            priority,
            status,
            created_by,
            assigned_to,
            due_date,
            created_at,
            updated_at,
        } = parts;
        Self {
            id,
            title,
            description,
            priority,
            status,
            created_by,
            assigned_to,
            due_date,
            created_at,
            updated_at,
        }
    }

    pub const fn id(&self) -> &TicketId {
        &self.id
    }

    pub const fn title(&self) -> &TicketTitle {
        &self.title
    }

    pub const fn description(&self) -> &TicketDescription {
        &self.description
    }

    pub const fn priority(&self) -> Priority {
        self.priority
    }

    pub const fn status(&self) -> TicketStatus {
        self.status
    }

    pub const fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub const fn assigned_to(&self) -> Option<&UserId> {
        self.assigned_to.as_ref()
    }

    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply the supplied field edits.
    ///
    /// Only fields whose value differs are reported; `updated_at` moves only
    /// when something changed.
    pub fn apply_changes(&mut self, changes: TicketChanges, now: DateTime<Utc>) -> ChangeSet {
        let mut set = ChangeSet::default();
        let TicketChanges {
            title,
            description,
            status,
            priority,
        } = changes;

        if let Some(title) = title {
            set.record("title", self.title.as_ref(), title.as_ref());
            self.title = title;
        }
        if let Some(description) = description {
            set.record(
                "description",
                self.description.as_ref(),
                description.as_ref(),
            );
            self.description = description;
        }
        if let Some(status) = status {
            set.record("status", self.status.as_str(), status.as_str());
            self.status = status;
        }
        if let Some(priority) = priority {
            set.record("priority", self.priority.as_str(), priority.as_str());
            self.priority = priority;
        }

        if !set.is_empty() {
            self.updated_at = now;
        }
        set
    }

    /// Assign the ticket and move it to in-progress.
    pub fn assign(&mut self, assignee: UserId, now: DateTime<Utc>) -> Assignment {
        let outcome = Assignment {
            previous_assignee: self.assigned_to.replace(assignee),
            previous_status: self.status,
        };
        self.status = TicketStatus::InProgress;
        self.updated_at = now;
        outcome
    }

    /// Reopen the ticket, returning the status it left.
    ///
    /// Reopening is deliberately not idempotent.
    pub fn reopen(&mut self, now: DateTime<Utc>) -> Result<TicketStatus, TicketTransitionError> {
        if self.status == TicketStatus::Reopened {
            return Err(TicketTransitionError::AlreadyReopened);
        }
        let previous = self.status;
        self.status = TicketStatus::Reopened;
        self.updated_at = now;
        Ok(previous)
    }
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;
