//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every `/api/v1` handler plus the health probes
//! - **Schemas**: request and response DTOs, and the wrappers in
//!   [`crate::inbound::http::schemas`] that describe domain types without
//!   coupling them to utoipa
//! - **Security**: the bearer JWT scheme issued by register and login
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::activity::{ActivityEntryResponse, ActivityListResponse};
use crate::inbound::http::comments::{
    CommentEnvelope, CommentListResponse, CommentRequest, CommentResponse,
};
use crate::inbound::http::envelope::MessageResponse;
use crate::inbound::http::schemas::{
    ActivityActionSchema, ErrorCodeSchema, ErrorSchema, PrioritySchema, RoleSchema,
    TicketStatusSchema,
};
use crate::inbound::http::tickets::{
    AssignTicketRequest, CreateTicketRequest, TicketEnvelope, TicketListResponse, TicketResponse,
    UpdateTicketRequest,
};
use crate::inbound::http::users::{
    LoginRequest, RegisterRequest, RoleRequest, SessionResponse, UserEnvelope, UserListResponse,
    UserResponse,
};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name under which the bearer scheme is registered.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let mut scheme = Http::new(HttpAuthScheme::Bearer);
        scheme.bearer_format = Some("JWT".to_owned());
        scheme.description =
            Some("Token returned by POST /api/v1/users/register or /users/login.".to_owned());
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Help desk API",
        description = "Role-based ticketing: accounts, tickets, comments and an audit trail."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::profile,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_role,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::tickets::create_ticket,
        crate::inbound::http::tickets::list_tickets,
        crate::inbound::http::tickets::get_ticket,
        crate::inbound::http::tickets::update_ticket,
        crate::inbound::http::tickets::delete_ticket,
        crate::inbound::http::tickets::assign_ticket,
        crate::inbound::http::tickets::reopen_ticket,
        crate::inbound::http::comments::add_comment,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::edit_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::activity::ticket_activity,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RoleSchema,
        PrioritySchema,
        TicketStatusSchema,
        ActivityActionSchema,
        MessageResponse,
        RegisterRequest,
        LoginRequest,
        RoleRequest,
        UserResponse,
        SessionResponse,
        UserEnvelope,
        UserListResponse,
        CreateTicketRequest,
        UpdateTicketRequest,
        AssignTicketRequest,
        TicketResponse,
        TicketEnvelope,
        TicketListResponse,
        CommentRequest,
        CommentResponse,
        CommentEnvelope,
        CommentListResponse,
        ActivityEntryResponse,
        ActivityListResponse,
    )),
    tags(
        (name = "users", description = "Registration, login and account administration"),
        (name = "tickets", description = "Ticket lifecycle"),
        (name = "comments", description = "Discussion on tickets"),
        (name = "activity", description = "Per-ticket audit trail"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document's surface.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_has_wire_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[rstest]
    #[case("/api/v1/users/register")]
    #[case("/api/v1/users/profile")]
    #[case("/api/v1/users/{id}/role")]
    #[case("/api/v1/tickets/{id}/assign")]
    #[case("/api/v1/tickets/{id}/reopen")]
    #[case("/api/v1/tickets/{id}/comments")]
    #[case("/api/v1/comments/{id}")]
    #[case("/api/v1/activity/ticket/{id}")]
    #[case("/health/ready")]
    fn documents_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");

        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }

    #[rstest]
    fn document_serialises_to_json() {
        let json = ApiDoc::openapi().to_json().expect("serialise");

        assert!(json.contains("\"Help desk API\""));
    }
}
