//! Activity log API handler.
//!
//! ```text
//! GET /api/v1/activity/ticket/{id}?order=asc
//! ```

use actix_web::{get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ActivityLogEntry, Error, LogOrder, TicketId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentActor;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_choice, parse_id};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivityQueryParams {
    /// `desc` (newest first, default) or `asc`.
    pub order: Option<String>,
}

fn parse_order(raw: Option<&str>) -> Result<LogOrder, Error> {
    let Some(raw) = raw else {
        return Ok(LogOrder::default());
    };
    parse_choice::<OrderParam>(raw, FieldName::new("order"), &["asc", "desc"]).map(|p| p.0)
}

struct OrderParam(LogOrder);

impl std::str::FromStr for OrderParam {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self(LogOrder::OldestFirst)),
            "desc" => Ok(Self(LogOrder::NewestFirst)),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntryResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub ticket_id: Option<String>,
    #[schema(example = "assigned")]
    pub action: String,
    #[schema(format = "uuid")]
    pub performed_by: String,
    #[schema(value_type = Object)]
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

impl From<&ActivityLogEntry> for ActivityEntryResponse {
    fn from(entry: &ActivityLogEntry) -> Self {
        Self {
            id: entry.id().to_string(),
            ticket_id: entry.ticket_id().map(ToString::to_string),
            action: entry.action().as_str().to_owned(),
            performed_by: entry.performed_by().to_string(),
            metadata: entry.metadata().clone(),
            created_at: entry.created_at(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityListResponse {
    pub message: String,
    pub entries: Vec<ActivityEntryResponse>,
}

/// Audit trail of a ticket. Technicians and admins only.
#[utoipa::path(
    get,
    path = "/api/v1/activity/ticket/{id}",
    params(
        ("id" = String, Path, description = "Ticket identifier"),
        ActivityQueryParams
    ),
    responses(
        (status = 200, description = "Activity entries", body = ActivityListResponse),
        (status = 400, description = "Invalid ticket ID or order", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["activity"],
    operation_id = "ticketActivity"
)]
#[get("/activity/ticket/{id}")]
pub async fn ticket_activity(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
    query: web::Query<ActivityQueryParams>,
) -> ApiResult<web::Json<ActivityListResponse>> {
    let ticket_id: TicketId = parse_id(&path, "ticket")?;
    let order = parse_order(query.order.as_deref())?;
    let entries = state.activity.for_ticket(&current, &ticket_id, order).await?;
    Ok(web::Json(ActivityListResponse {
        message: "Fetched activity log".to_owned(),
        entries: entries.iter().map(ActivityEntryResponse::from).collect(),
    }))
}
