//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with the resource's current state.
    #[schema(rename = "conflict")]
    Conflict,
    /// An admin tried to change their own role or delete their own account.
    #[schema(rename = "self_action")]
    SelfAction,
    /// A backing store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Invalid ticket ID")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Role`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Role)]
pub enum RoleSchema {
    #[schema(rename = "client")]
    Client,
    #[schema(rename = "technician")]
    Technician,
    #[schema(rename = "admin")]
    Admin,
}

/// OpenAPI schema for [`crate::domain::Priority`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Priority)]
pub enum PrioritySchema {
    #[schema(rename = "low")]
    Low,
    #[schema(rename = "medium")]
    Medium,
    #[schema(rename = "high")]
    High,
}

/// OpenAPI schema for [`crate::domain::TicketStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::TicketStatus)]
pub enum TicketStatusSchema {
    #[schema(rename = "open")]
    Open,
    #[schema(rename = "in_progress")]
    InProgress,
    #[schema(rename = "closed")]
    Closed,
    #[schema(rename = "reopened")]
    Reopened,
}

/// OpenAPI schema for [`crate::domain::ActivityAction`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ActivityAction)]
pub enum ActivityActionSchema {
    #[schema(rename = "created")]
    Created,
    #[schema(rename = "updated")]
    Updated,
    #[schema(rename = "deleted")]
    Deleted,
    #[schema(rename = "assigned")]
    Assigned,
    #[schema(rename = "reopened")]
    Reopened,
    #[schema(rename = "comment_added")]
    CommentAdded,
    #[schema(rename = "comment_edited")]
    CommentEdited,
    #[schema(rename = "comment_deleted")]
    CommentDeleted,
    #[schema(rename = "role_updated")]
    RoleUpdated,
    #[schema(rename = "user_created")]
    UserCreated,
    #[schema(rename = "user_deleted")]
    UserDeleted,
}
