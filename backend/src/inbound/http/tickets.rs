//! Ticket API handlers.
//!
//! ```text
//! POST /api/v1/tickets
//! GET /api/v1/tickets
//! GET /api/v1/tickets/{id}
//! PATCH /api/v1/tickets/{id}
//! DELETE /api/v1/tickets/{id}
//! PATCH /api/v1/tickets/{id}/assign {"assignedTo":"<uuid>"}
//! PATCH /api/v1/tickets/{id}/reopen
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, Priority, Ticket, TicketChanges, TicketDescription, TicketDraft, TicketId,
    TicketStatus, TicketTitle, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentActor;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::envelope::MessageResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_body_id, parse_choice, parse_due_date, parse_id, require,
    ticket_validation_error,
};

const TITLE: FieldName = FieldName::new("title");
const DESCRIPTION: FieldName = FieldName::new("description");
const PRIORITY: FieldName = FieldName::new("priority");
const STATUS: FieldName = FieldName::new("status");
const ASSIGNED_TO: FieldName = FieldName::new("assignedTo");
const DUE_DATE: FieldName = FieldName::new("dueDate");

const PRIORITIES: [&str; 3] = ["low", "medium", "high"];
const STATUSES: [&str; 4] = ["open", "in_progress", "closed", "reopened"];

fn parse_priority(raw: Option<&str>) -> Result<Option<Priority>, Error> {
    raw.map(|value| parse_choice(value, PRIORITY, &PRIORITIES))
        .transpose()
}

fn parse_status(raw: Option<&str>) -> Result<Option<TicketStatus>, Error> {
    raw.map(|value| parse_choice(value, STATUS, &STATUSES))
        .transpose()
}

/// Request body for `POST /api/v1/tickets`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    #[schema(example = "VPN drops every hour")]
    pub title: Option<String>,
    #[schema(example = "Since Monday the tunnel resets on the hour.")]
    pub description: Option<String>,
    /// `low`, `medium` (default) or `high`.
    pub priority: Option<String>,
    /// Defaults to `open`.
    pub status: Option<String>,
    #[schema(format = "uuid")]
    pub assigned_to: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[schema(example = "2025-03-01")]
    pub due_date: Option<String>,
}

impl TryFrom<CreateTicketRequest> for TicketDraft {
    type Error = Error;

    fn try_from(value: CreateTicketRequest) -> Result<Self, Self::Error> {
        let title = require(value.title, TITLE)?;
        let description = require(value.description, DESCRIPTION)?;
        Ok(Self {
            title: TicketTitle::new(title).map_err(ticket_validation_error)?,
            description: TicketDescription::new(description).map_err(ticket_validation_error)?,
            priority: parse_priority(value.priority.as_deref())?,
            status: parse_status(value.status.as_deref())?,
            assigned_to: value
                .assigned_to
                .as_deref()
                .map(|raw| parse_body_id::<UserId>(raw, ASSIGNED_TO))
                .transpose()?,
            due_date: value
                .due_date
                .as_deref()
                .map(|raw| parse_due_date(raw, DUE_DATE))
                .transpose()?,
        })
    }
}

/// Request body for `PATCH /api/v1/tickets/{id}`. Absent fields stay as
/// they are.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl TryFrom<UpdateTicketRequest> for TicketChanges {
    type Error = Error;

    fn try_from(value: UpdateTicketRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value
                .title
                .map(TicketTitle::new)
                .transpose()
                .map_err(ticket_validation_error)?,
            description: value
                .description
                .map(TicketDescription::new)
                .transpose()
                .map_err(ticket_validation_error)?,
            status: parse_status(value.status.as_deref())?,
            priority: parse_priority(value.priority.as_deref())?,
        })
    }
}

/// Request body for `PATCH /api/v1/tickets/{id}/assign`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignTicketRequest {
    #[schema(format = "uuid")]
    pub assigned_to: Option<String>,
}

/// Ticket as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[schema(example = "medium")]
    pub priority: String,
    #[schema(example = "open")]
    pub status: String,
    #[schema(format = "uuid")]
    pub created_by: String,
    #[schema(format = "uuid")]
    pub assigned_to: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Ticket> for TicketResponse {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id().to_string(),
            title: AsRef::<str>::as_ref(ticket.title()).to_owned(),
            description: AsRef::<str>::as_ref(ticket.description()).to_owned(),
            priority: ticket.priority().as_str().to_owned(),
            status: ticket.status().as_str().to_owned(),
            created_by: ticket.created_by().to_string(),
            assigned_to: ticket.assigned_to().map(ToString::to_string),
            due_date: ticket.due_date(),
            created_at: ticket.created_at(),
            updated_at: ticket.updated_at(),
        }
    }
}

/// Envelope for single-ticket responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct TicketEnvelope {
    pub message: String,
    pub ticket: TicketResponse,
}

impl TicketEnvelope {
    fn new(message: &str, ticket: &Ticket) -> Self {
        Self {
            message: message.to_owned(),
            ticket: ticket.into(),
        }
    }
}

/// Envelope for the ticket listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct TicketListResponse {
    pub message: String,
    pub tickets: Vec<TicketResponse>,
}

/// Open a ticket owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/tickets",
    request_body = CreateTicketRequest,
    responses(
        (status = 201, description = "Ticket created", body = TicketEnvelope),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Assignment not permitted", body = ErrorSchema),
        (status = 404, description = "Assigned user not found", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "createTicket"
)]
#[post("/tickets")]
pub async fn create_ticket(
    state: web::Data<HttpState>,
    current: CurrentActor,
    payload: web::Json<CreateTicketRequest>,
) -> ApiResult<HttpResponse> {
    let draft = TicketDraft::try_from(payload.into_inner())?;
    let ticket = state.tickets.create(&current, draft).await?;
    Ok(HttpResponse::Created().json(TicketEnvelope::new("Ticket successfully created", &ticket)))
}

/// Tickets visible to the caller, newest first.
///
/// Admins see every ticket, technicians those assigned to them and clients
/// those they created.
#[utoipa::path(
    get,
    path = "/api/v1/tickets",
    responses(
        (status = 200, description = "Visible tickets", body = TicketListResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "listTickets"
)]
#[get("/tickets")]
pub async fn list_tickets(
    state: web::Data<HttpState>,
    current: CurrentActor,
) -> ApiResult<web::Json<TicketListResponse>> {
    let tickets = state.tickets.list(&current).await?;
    Ok(web::Json(TicketListResponse {
        message: "Fetched tickets".to_owned(),
        tickets: tickets.iter().map(TicketResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/tickets/{id}",
    params(("id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Ticket", body = TicketEnvelope),
        (status = 400, description = "Invalid ticket ID", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Ticket not found", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "getTicket"
)]
#[get("/tickets/{id}")]
pub async fn get_ticket(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<web::Json<TicketEnvelope>> {
    let id: TicketId = parse_id(&path, "ticket")?;
    let ticket = state.tickets.get(&current, &id).await?;
    Ok(web::Json(TicketEnvelope::new(
        "Ticket retrieved successfully",
        &ticket,
    )))
}

#[utoipa::path(
    patch,
    path = "/api/v1/tickets/{id}",
    params(("id" = String, Path, description = "Ticket identifier")),
    request_body = UpdateTicketRequest,
    responses(
        (status = 200, description = "Ticket updated", body = TicketEnvelope),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Ticket not found", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "updateTicket"
)]
#[patch("/tickets/{id}")]
pub async fn update_ticket(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
    payload: web::Json<UpdateTicketRequest>,
) -> ApiResult<web::Json<TicketEnvelope>> {
    let id: TicketId = parse_id(&path, "ticket")?;
    let changes = TicketChanges::try_from(payload.into_inner())?;
    let ticket = state.tickets.update(&current, &id, changes).await?;
    Ok(web::Json(TicketEnvelope::new(
        "Ticket updated successfully",
        &ticket,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tickets/{id}",
    params(("id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Ticket deleted", body = MessageResponse),
        (status = 400, description = "Invalid ticket ID", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Ticket not found", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "deleteTicket"
)]
#[delete("/tickets/{id}")]
pub async fn delete_ticket(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id: TicketId = parse_id(&path, "ticket")?;
    state.tickets.delete(&current, &id).await?;
    Ok(web::Json(MessageResponse::new("Ticket deleted successfully")))
}

/// Assign a ticket. Admins may pick anyone; technicians only themselves.
#[utoipa::path(
    patch,
    path = "/api/v1/tickets/{id}/assign",
    params(("id" = String, Path, description = "Ticket identifier")),
    request_body = AssignTicketRequest,
    responses(
        (status = 200, description = "Ticket assigned", body = TicketEnvelope),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Ticket or user not found", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "assignTicket"
)]
#[patch("/tickets/{id}/assign")]
pub async fn assign_ticket(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
    payload: web::Json<AssignTicketRequest>,
) -> ApiResult<web::Json<TicketEnvelope>> {
    let id: TicketId = parse_id(&path, "ticket")?;
    let raw = require(payload.into_inner().assigned_to, ASSIGNED_TO)?;
    let assignee: UserId = parse_body_id(&raw, ASSIGNED_TO)?;
    let ticket = state.tickets.assign(&current, &id, &assignee).await?;
    Ok(web::Json(TicketEnvelope::new(
        "Ticket assigned successfully",
        &ticket,
    )))
}

/// Reopen a ticket. Only once: a reopened ticket cannot be reopened again.
#[utoipa::path(
    patch,
    path = "/api/v1/tickets/{id}/reopen",
    params(("id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Ticket reopened", body = TicketEnvelope),
        (status = 400, description = "Invalid ticket ID", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Ticket not found", body = ErrorSchema),
        (status = 409, description = "Ticket is already reopened", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "reopenTicket"
)]
#[patch("/tickets/{id}/reopen")]
pub async fn reopen_ticket(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<web::Json<TicketEnvelope>> {
    let id: TicketId = parse_id(&path, "ticket")?;
    let ticket = state.tickets.reopen(&current, &id).await?;
    Ok(web::Json(TicketEnvelope::new(
        "Ticket reopened successfully",
        &ticket,
    )))
}

#[cfg(test)]
#[path = "tickets_tests.rs"]
mod tests;
