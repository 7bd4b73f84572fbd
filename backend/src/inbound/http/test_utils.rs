//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    MockAccountService, MockActivityQuery, MockAuthenticator, MockCommentWorkflow,
    MockTicketWorkflow, MockUserDirectory,
};
use crate::domain::{
    Actor, Comment, CommentContent, CommentId, EmailAddress, Error, Role, Ticket,
    TicketDescription, TicketDraft, TicketId, TicketTitle, User, UserId, UserName,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Deterministic actor built from a small integer.
pub fn actor(n: u128, role: Role) -> Actor {
    Actor::new(UserId::from_uuid(Uuid::from_u128(n)), role)
}

/// Fixed timestamp for DTO snapshots.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5)
        .single()
        .expect("valid fixed timestamp")
}

/// Stored user whose id matches [`actor`] for the same `n`.
pub fn user(n: u128, role: Role) -> User {
    User::register(
        UserId::from_uuid(Uuid::from_u128(n)),
        UserName::new(format!("User {n}")).expect("valid name"),
        EmailAddress::new(format!("user{n}@example.com")).expect("valid email"),
        role,
        fixed_now(),
    )
}

/// Open ticket `n` created by user `owner`.
pub fn ticket(n: u128, owner: u128) -> Ticket {
    let draft = TicketDraft {
        title: TicketTitle::new("Printer on fire").expect("valid title"),
        description: TicketDescription::new("Third floor").expect("valid description"),
        priority: None,
        status: None,
        assigned_to: None,
        due_date: None,
    };
    Ticket::open(
        TicketId::from_uuid(Uuid::from_u128(n)),
        draft,
        UserId::from_uuid(Uuid::from_u128(owner)),
        fixed_now(),
    )
}

/// Comment `n` on ticket `ticket`, written by user `author`.
pub fn comment(n: u128, ticket: u128, author: u128) -> Comment {
    Comment::post(
        CommentId::from_uuid(Uuid::from_u128(n)),
        TicketId::from_uuid(Uuid::from_u128(ticket)),
        UserId::from_uuid(Uuid::from_u128(author)),
        CommentContent::new("Have you tried turning it off?").expect("valid content"),
        fixed_now(),
    )
}

/// Assemble an [`HttpState`] from port mocks.
///
/// Every port defaults to a mock with no expectations, so an unexpected call
/// fails the test.
#[derive(Default)]
pub struct StateBuilder {
    pub accounts: MockAccountService,
    pub authenticator: MockAuthenticator,
    pub users: MockUserDirectory,
    pub tickets: MockTicketWorkflow,
    pub comments: MockCommentWorkflow,
    pub activity: MockActivityQuery,
}

impl StateBuilder {
    /// Authenticate every request as `actor`.
    pub fn authenticate_as(mut self, actor: Actor) -> Self {
        self.authenticator
            .expect_authenticate()
            .returning(move |_| Ok(actor));
        self
    }

    /// Reject every request with `error`.
    pub fn reject_with(mut self, error: Error) -> Self {
        self.authenticator
            .expect_authenticate()
            .returning(move |_| Err(error.clone()));
        self
    }

    pub fn build(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            accounts: Arc::new(self.accounts),
            authenticator: Arc::new(self.authenticator),
            users: Arc::new(self.users),
            tickets: Arc::new(self.tickets),
            comments: Arc::new(self.comments),
            activity: Arc::new(self.activity),
        })
    }
}
