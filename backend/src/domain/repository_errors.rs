//! Translation of driven-port failures into domain errors.
//!
//! Connection failures surface as `service_unavailable`; anything else a
//! repository reports is an internal error whose detail is logged, never
//! shown to clients.

use tracing::error;

use super::Error;
use super::ports::{
    ActivityLogRepositoryError, CommentRepositoryError, PasswordHashError, TicketRepositoryError,
    TokenError, UserRepositoryError,
};

fn unavailable(store: &'static str, message: &str) -> Error {
    error!(store, %message, "repository unavailable");
    Error::service_unavailable(format!("{store} repository unavailable"))
}

fn failed(store: &'static str, message: &str) -> Error {
    error!(store, %message, "repository query failed");
    Error::internal(format!("{store} repository error: {message}"))
}

pub(crate) fn map_ticket_error(error: TicketRepositoryError) -> Error {
    match error {
        TicketRepositoryError::Connection { message } => unavailable("ticket", &message),
        TicketRepositoryError::Query { message } => failed("ticket", &message),
    }
}

pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => unavailable("user", &message),
        UserRepositoryError::Query { message } => failed("user", &message),
        UserRepositoryError::DuplicateEmail { .. } => Error::conflict("User already exists"),
    }
}

pub(crate) fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => unavailable("comment", &message),
        CommentRepositoryError::Query { message } => failed("comment", &message),
    }
}

pub(crate) fn map_activity_error(error: ActivityLogRepositoryError) -> Error {
    match error {
        ActivityLogRepositoryError::Connection { message } => unavailable("activity log", &message),
        ActivityLogRepositoryError::Query { message } => failed("activity log", &message),
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    error!(%error, "password hashing failed");
    Error::internal(format!("credential processing failed: {error}"))
}

pub(crate) fn map_signing_error(error: TokenError) -> Error {
    error!(%error, "token issuance failed");
    Error::internal(format!("token issuance failed: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(TicketRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(TicketRepositoryError::query("syntax"), ErrorCode::InternalError)]
    fn ticket_errors_map_by_kind(#[case] error: TicketRepositoryError, #[case] code: ErrorCode) {
        assert_eq!(map_ticket_error(error).code(), code);
    }

    #[rstest]
    fn duplicate_email_is_a_conflict() {
        let error = map_user_error(UserRepositoryError::duplicate_email("ada@example.com"));
        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(error.message(), "User already exists");
    }
}
