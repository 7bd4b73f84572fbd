//! Domain primitives, aggregates and use-case services.
//!
//! Purpose: Define strongly typed entities for the help desk (users,
//! tickets, comments and the activity log), the authorisation policy that
//! governs them, and the services implementing the driving ports. Types keep
//! their invariants behind validated constructors; serde contracts are
//! documented on each type.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable error identifier.
//! - Ticket, Comment, User, ActivityLogEntry: aggregates.
//! - `policy`: the pure authorisation decision function.
//! - `ports`: driving and driven port traits.
//! - Service types implementing the driving ports.

pub mod account_service;
pub mod activity;
pub mod activity_service;
pub mod audit;
pub mod auth;
pub mod authenticator_service;
pub mod comment;
pub mod comment_service;
pub mod error;
pub mod identifier;
pub mod identity;
pub mod policy;
pub mod ports;
mod repository_errors;
pub mod ticket;
pub mod ticket_service;
pub mod trace_id;
pub mod user;
pub mod user_directory_service;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::account_service::AccountManager;
pub use self::activity::{
    ActivityAction, ActivityLogEntry, ActivityRecord, LogOrder, UnknownActivityAction,
};
pub use self::activity_service::ActivityQueryService;
pub use self::audit::AuditTrail;
pub use self::auth::{LoginCredentials, LoginValidationError, Registration};
pub use self::authenticator_service::{RoleSource, TokenAuthenticator};
pub use self::comment::{Comment, CommentContent, CommentParts, CommentValidationError};
pub use self::comment_service::CommentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identifier::{ActivityId, CommentId, IdentifierError, TicketId, UserId};
pub use self::identity::{Actor, Role, UnknownRole};
pub use self::policy::{Action, AllowReason, Decision, DenyReason, ResourceOwnership, TicketScope};
pub use self::ticket::{
    Assignment, ChangeSet, FieldChange, Priority, Ticket, TicketChanges, TicketDescription,
    TicketDraft, TicketParts, TicketStatus, TicketTitle, TicketTransitionError,
    TicketValidationError,
};
pub use self::ticket_service::TicketService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    CredentialHash, EmailAddress, PASSWORD_MIN, PlainPassword, USER_NAME_MAX, User, UserName,
    UserParts, UserValidationError,
};
pub use self::user_directory_service::UserDirectoryService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use helpdesk::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
