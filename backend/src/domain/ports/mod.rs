//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, token codec, password hasher) are implemented
//! by outbound adapters. Driving ports (workflows, queries, account and
//! authentication services) are implemented by domain services and called
//! by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod activity_log_repository;
mod activity_query;
mod authenticator;
mod comment_repository;
mod comment_workflow;
mod password_hasher;
mod ticket_repository;
mod ticket_workflow;
mod token_codec;
mod user_directory;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::{AccountService, AuthenticatedSession};
#[cfg(test)]
pub use activity_log_repository::MockActivityLogRepository;
pub use activity_log_repository::{ActivityLogRepository, ActivityLogRepositoryError};
#[cfg(test)]
pub use activity_query::MockActivityQuery;
pub use activity_query::ActivityQuery;
#[cfg(test)]
pub use authenticator::MockAuthenticator;
pub use authenticator::Authenticator;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
#[cfg(test)]
pub use comment_workflow::MockCommentWorkflow;
pub use comment_workflow::CommentWorkflow;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use ticket_repository::MockTicketRepository;
pub use ticket_repository::{TicketRepository, TicketRepositoryError};
#[cfg(test)]
pub use ticket_workflow::MockTicketWorkflow;
pub use ticket_workflow::TicketWorkflow;
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{IssuedToken, TokenClaims, TokenCodec, TokenError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserRepository, UserRepositoryError};
