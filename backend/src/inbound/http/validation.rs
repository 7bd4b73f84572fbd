//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs carry raw strings; these helpers turn them into domain values
//! and report failures as `invalid_request` errors whose `details` name the
//! offending field and a machine-readable code.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::domain::{
    CommentValidationError, Error, IdentifierError, LoginValidationError, TicketValidationError,
    UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidValue,
    EmptyField,
    TooLong,
    InvalidEmail,
    TooShort,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::EmptyField => "empty_field",
            ErrorCode::TooLong => "too_long",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::TooShort => "too_short",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} is required")).with_code(ErrorCode::MissingField)
}

/// Require an optional body field to be present.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse a path identifier, e.g. `parse_id::<TicketId>(raw, "ticket")`.
///
/// Failures read `"Invalid ticket ID"`.
pub(crate) fn parse_id<T>(raw: &str, entity: &'static str) -> Result<T, Error>
where
    T: FromStr<Err = IdentifierError>,
{
    raw.parse().map_err(|_: IdentifierError| {
        ValidationError::new(FieldName::new("id"), format!("Invalid {entity} ID"))
            .with_value(ErrorCode::InvalidUuid, raw)
    })
}

/// Parse an identifier carried in a body field.
pub(crate) fn parse_body_id<T>(raw: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = IdentifierError>,
{
    let name = field.as_str();
    raw.parse().map_err(|_: IdentifierError| {
        ValidationError::new(field, format!("{name} must be a valid UUID"))
            .with_value(ErrorCode::InvalidUuid, raw)
    })
}

/// Parse one of a closed set of lowercase spellings.
pub(crate) fn parse_choice<T: FromStr>(
    raw: &str,
    field: FieldName,
    allowed: &[&str],
) -> Result<T, Error> {
    let name = field.as_str();
    raw.parse().map_err(|_| {
        ValidationError::new(
            field,
            format!("{name} must be one of: {}", allowed.join(", ")),
        )
        .with_value(ErrorCode::InvalidValue, raw)
    })
}

/// Accept an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_due_date(raw: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    let trimmed = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| {
            let name = field.as_str();
            ValidationError::new(
                field,
                format!("{name} must be an RFC 3339 timestamp or a YYYY-MM-DD date"),
            )
            .with_value(ErrorCode::InvalidDate, raw)
        })
}

pub(crate) fn ticket_validation_error(err: TicketValidationError) -> Error {
    let (field, code) = match &err {
        TicketValidationError::EmptyTitle => ("title", ErrorCode::EmptyField),
        TicketValidationError::EmptyDescription => ("description", ErrorCode::EmptyField),
        TicketValidationError::UnknownPriority { .. } => ("priority", ErrorCode::InvalidValue),
        TicketValidationError::UnknownStatus { .. } => ("status", ErrorCode::InvalidValue),
    };
    ValidationError::new(FieldName::new(field), capitalise(&err.to_string())).with_code(code)
}

pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    let (field, code) = match &err {
        UserValidationError::EmptyName => ("name", ErrorCode::EmptyField),
        UserValidationError::NameTooLong { .. } => ("name", ErrorCode::TooLong),
        UserValidationError::InvalidEmail => ("email", ErrorCode::InvalidEmail),
        UserValidationError::PasswordTooShort { .. } => ("password", ErrorCode::TooShort),
    };
    ValidationError::new(FieldName::new(field), capitalise(&err.to_string())).with_code(code)
}

pub(crate) fn login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match &err {
        LoginValidationError::InvalidEmail => ("email", ErrorCode::InvalidEmail),
        LoginValidationError::EmptyPassword => ("password", ErrorCode::EmptyField),
    };
    ValidationError::new(FieldName::new(field), capitalise(&err.to_string())).with_code(code)
}

pub(crate) fn comment_validation_error(err: CommentValidationError) -> Error {
    let CommentValidationError::EmptyContent = err;
    ValidationError::new(FieldName::new("content"), "Comment content is required")
        .with_code(ErrorCode::EmptyField)
}

fn capitalise(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
