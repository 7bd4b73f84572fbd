//! Authorisation policy engine.
//!
//! [`decide`] is a pure function: it sees the actor, the ownership facts of
//! the resource (already fetched by the caller) and the requested action,
//! and returns a tagged [`Decision`]. It performs no I/O and never panics,
//! so every rule is unit-testable in isolation.
//!
//! Rules, first match wins:
//! 1. Admins may do anything except change their own role or delete their
//!    own account.
//! 2. Assignment is narrower than everything else: a technician may assign
//!    only to themselves; clients may not assign at all.
//! 3. Reading activity is open to technicians; user administration is
//!    admin-only.
//! 4. The resource owner may view, update, delete, reopen, and edit or
//!    delete their own comments.
//! 5. The assigned technician may view, update, delete, and reopen the ticket.
//! 6. Everything else is denied.

use std::fmt;

use serde_json::json;
use tracing::warn;

use super::{Actor, Error, Role, UserId};

/// Ownership facts about the resource an action targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceOwnership<'a> {
    pub owner: Option<&'a UserId>,
    pub assignee: Option<&'a UserId>,
}

impl<'a> ResourceOwnership<'a> {
    /// No resource: coarse, role-only checks.
    pub const fn none() -> Self {
        Self {
            owner: None,
            assignee: None,
        }
    }

    pub const fn owned_by(owner: &'a UserId) -> Self {
        Self {
            owner: Some(owner),
            assignee: None,
        }
    }

    pub const fn ticket(owner: &'a UserId, assignee: Option<&'a UserId>) -> Self {
        Self {
            owner: Some(owner),
            assignee,
        }
    }
}

/// A capability request evaluated by [`decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    ViewTicket,
    UpdateTicket,
    DeleteTicket,
    ReopenTicket,
    EditComment,
    DeleteComment,
    AssignTicket { assignee: &'a UserId },
    ViewActivity,
    ManageUsers,
    ChangeUserRole { target: &'a UserId },
    DeleteUser { target: &'a UserId },
}

impl Action<'_> {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ViewTicket => "view_ticket",
            Self::UpdateTicket => "update_ticket",
            Self::DeleteTicket => "delete_ticket",
            Self::ReopenTicket => "reopen_ticket",
            Self::EditComment => "edit_comment",
            Self::DeleteComment => "delete_comment",
            Self::AssignTicket { .. } => "assign_ticket",
            Self::ViewActivity => "view_activity",
            Self::ManageUsers => "manage_users",
            Self::ChangeUserRole { .. } => "change_user_role",
            Self::DeleteUser { .. } => "delete_user",
        }
    }
}

/// Why an action was allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    Admin,
    SelfAssignment,
    StaffRole,
    Owner,
    Assignee,
}

/// Why an action was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// An admin targeted their own account.
    SelfAction,
    /// A technician tried to assign a ticket to somebody else.
    AssignToOthers,
    /// The actor's role never grants this action.
    InsufficientRole,
    /// The actor has no ownership or assignment relation to the resource.
    NotPermitted,
}

impl DenyReason {
    pub const fn code(self) -> &'static str {
        match self {
            Self::SelfAction => "self_action",
            Self::AssignToOthers => "assign_to_others",
            Self::InsufficientRole => "insufficient_role",
            Self::NotPermitted => "not_permitted",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow(AllowReason),
    Deny(DenyReason),
}

impl Decision {
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }

    /// Convert a denial into the matching domain error.
    ///
    /// Self-action denials map to [`Error::self_action`]; every other denial
    /// maps to [`Error::forbidden`] with the reason code in `details`.
    pub fn into_result(self, message: &str) -> Result<AllowReason, Error> {
        match self {
            Self::Allow(reason) => Ok(reason),
            Self::Deny(DenyReason::SelfAction) => Err(Error::self_action(message)
                .with_details(json!({ "code": DenyReason::SelfAction.code() }))),
            Self::Deny(reason) => {
                Err(Error::forbidden(message).with_details(json!({ "code": reason.code() })))
            }
        }
    }
}

/// Evaluate `action` for `actor` against the resource's ownership facts.
pub fn decide(actor: &Actor, resource: &ResourceOwnership<'_>, action: &Action<'_>) -> Decision {
    if actor.is_admin() {
        return decide_admin(actor, action);
    }

    match action {
        Action::AssignTicket { assignee } => decide_assignment(actor, assignee),
        Action::ViewActivity => staff_only(actor),
        Action::ManageUsers | Action::ChangeUserRole { .. } | Action::DeleteUser { .. } => {
            Decision::Deny(DenyReason::InsufficientRole)
        }
        Action::ViewTicket
        | Action::UpdateTicket
        | Action::DeleteTicket
        | Action::ReopenTicket
        | Action::EditComment
        | Action::DeleteComment => decide_by_relationship(actor, resource, action),
    }
}

fn decide_admin(actor: &Actor, action: &Action<'_>) -> Decision {
    match action {
        Action::ChangeUserRole { target } | Action::DeleteUser { target }
            if *target == actor.id() =>
        {
            Decision::Deny(DenyReason::SelfAction)
        }
        _ => Decision::Allow(AllowReason::Admin),
    }
}

fn decide_assignment(actor: &Actor, assignee: &UserId) -> Decision {
    match actor.role() {
        Role::Technician if assignee == actor.id() => Decision::Allow(AllowReason::SelfAssignment),
        Role::Technician => Decision::Deny(DenyReason::AssignToOthers),
        Role::Client | Role::Admin => Decision::Deny(DenyReason::InsufficientRole),
    }
}

fn staff_only(actor: &Actor) -> Decision {
    match actor.role() {
        Role::Technician | Role::Admin => Decision::Allow(AllowReason::StaffRole),
        Role::Client => Decision::Deny(DenyReason::InsufficientRole),
    }
}

fn decide_by_relationship(
    actor: &Actor,
    resource: &ResourceOwnership<'_>,
    action: &Action<'_>,
) -> Decision {
    if resource.owner == Some(actor.id()) {
        return Decision::Allow(AllowReason::Owner);
    }

    let assignee_may_act = matches!(
        action,
        Action::ViewTicket | Action::UpdateTicket | Action::DeleteTicket | Action::ReopenTicket
    );
    if assignee_may_act
        && actor.role() == Role::Technician
        && resource.assignee == Some(actor.id())
    {
        return Decision::Allow(AllowReason::Assignee);
    }

    Decision::Deny(DenyReason::NotPermitted)
}

/// Client-facing wording for a denial.
pub fn denial_message(action: &Action<'_>, reason: DenyReason) -> &'static str {
    match (reason, action) {
        (DenyReason::SelfAction, Action::ChangeUserRole { .. }) => {
            "Admins cannot change their own role"
        }
        (DenyReason::SelfAction, _) => "Admins cannot delete their own account",
        (DenyReason::AssignToOthers, _) => "Technicians can only assign tickets to themselves",
        (DenyReason::InsufficientRole, Action::AssignTicket { .. }) => {
            "Only admins and technicians can assign tickets"
        }
        (DenyReason::InsufficientRole, Action::ViewActivity) => {
            "Only admins and technicians can view activity logs"
        }
        (DenyReason::InsufficientRole, _) => "Admin access required",
        (DenyReason::NotPermitted, Action::ViewTicket) => "Not authorized to view this ticket",
        (DenyReason::NotPermitted, Action::UpdateTicket) => "Not authorized to update this ticket",
        (DenyReason::NotPermitted, Action::DeleteTicket) => "Not authorized to delete this ticket",
        (DenyReason::NotPermitted, Action::ReopenTicket) => "Not authorized to reopen this ticket",
        (DenyReason::NotPermitted, Action::EditComment) => "You can only edit your own comments",
        (DenyReason::NotPermitted, Action::DeleteComment) => {
            "You can only delete your own comments"
        }
        (DenyReason::NotPermitted, _) => "Not authorized to perform this action",
    }
}

/// Evaluate and enforce a decision, logging denials at `warn`.
pub fn enforce(
    actor: &Actor,
    resource: &ResourceOwnership<'_>,
    action: &Action<'_>,
) -> Result<AllowReason, Error> {
    let decision = decide(actor, resource, action);
    match decision {
        Decision::Allow(reason) => Ok(reason),
        Decision::Deny(reason) => {
            warn!(
                actor_id = %actor.id(),
                role = %actor.role(),
                action = action.name(),
                %reason,
                "policy denied action"
            );
            decision.into_result(denial_message(action, reason))
        }
    }
}

/// Which tickets a listing may return for an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketScope {
    All,
    CreatedBy(UserId),
    CreatedByOrAssignedTo(UserId),
}

impl TicketScope {
    /// Scope listings by role: admins see everything, technicians see what
    /// they created or were assigned, clients see what they created.
    pub const fn for_actor(actor: &Actor) -> Self {
        match actor.role() {
            Role::Admin => Self::All,
            Role::Technician => Self::CreatedByOrAssignedTo(*actor.id()),
            Role::Client => Self::CreatedBy(*actor.id()),
        }
    }

    /// Whether a ticket with these relations falls inside the scope.
    pub fn admits(&self, created_by: &UserId, assigned_to: Option<&UserId>) -> bool {
        match self {
            Self::All => true,
            Self::CreatedBy(id) => created_by == id,
            Self::CreatedByOrAssignedTo(id) => created_by == id || assigned_to == Some(id),
        }
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
