//! Comment API handlers.
//!
//! ```text
//! POST /api/v1/tickets/{id}/comments {"content":"..."}
//! GET /api/v1/tickets/{id}/comments
//! PUT /api/v1/comments/{id} {"content":"..."}
//! DELETE /api/v1/comments/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Comment, CommentContent, CommentId, Error, TicketId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentActor;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::envelope::MessageResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, comment_validation_error, parse_id, require,
};

/// Body shared by comment creation and edits.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CommentRequest {
    #[schema(example = "Rebooted the router, still failing.")]
    pub content: Option<String>,
}

impl TryFrom<CommentRequest> for CommentContent {
    type Error = Error;

    fn try_from(value: CommentRequest) -> Result<Self, Self::Error> {
        let raw = require(value.content, FieldName::new("content"))?;
        Self::new(raw).map_err(comment_validation_error)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub ticket_id: String,
    #[schema(format = "uuid")]
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id().to_string(),
            ticket_id: comment.ticket_id().to_string(),
            author: comment.author().to_string(),
            content: AsRef::<str>::as_ref(comment.content()).to_owned(),
            created_at: comment.created_at(),
            updated_at: comment.updated_at(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentEnvelope {
    pub message: String,
    pub comment: CommentResponse,
}

impl CommentEnvelope {
    fn new(message: &str, comment: &Comment) -> Self {
        Self {
            message: message.to_owned(),
            comment: comment.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentListResponse {
    pub message: String,
    pub comments: Vec<CommentResponse>,
}

/// Comment on a ticket. Any authenticated user may comment.
#[utoipa::path(
    post,
    path = "/api/v1/tickets/{id}/comments",
    params(("id" = String, Path, description = "Ticket identifier")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment added", body = CommentEnvelope),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Ticket not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "addComment"
)]
#[post("/tickets/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let ticket_id: TicketId = parse_id(&path, "ticket")?;
    let content = CommentContent::try_from(payload.into_inner())?;
    let comment = state.comments.add(&current, &ticket_id, content).await?;
    Ok(HttpResponse::Created().json(CommentEnvelope::new("Comment added successfully", &comment)))
}

/// Comments on a ticket, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/{id}/comments",
    params(("id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Comments", body = CommentListResponse),
        (status = 400, description = "Invalid ticket ID", body = ErrorSchema),
        (status = 404, description = "Ticket not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "listComments"
)]
#[get("/tickets/{id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<web::Json<CommentListResponse>> {
    let ticket_id: TicketId = parse_id(&path, "ticket")?;
    let comments = state.comments.list_for_ticket(&current, &ticket_id).await?;
    Ok(web::Json(CommentListResponse {
        message: "Fetched comments".to_owned(),
        comments: comments.iter().map(CommentResponse::from).collect(),
    }))
}

/// Replace a comment's content. Author only.
#[utoipa::path(
    put,
    path = "/api/v1/comments/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = CommentEnvelope),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "editComment"
)]
#[put("/comments/{id}")]
pub async fn edit_comment(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<web::Json<CommentEnvelope>> {
    let id: CommentId = parse_id(&path, "comment")?;
    let content = CommentContent::try_from(payload.into_inner())?;
    let comment = state.comments.edit(&current, &id, content).await?;
    Ok(web::Json(CommentEnvelope::new(
        "Comment updated successfully",
        &comment,
    )))
}

/// Delete a comment. Author or admin.
#[utoipa::path(
    delete,
    path = "/api/v1/comments/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 400, description = "Invalid comment ID", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id: CommentId = parse_id(&path, "comment")?;
    state.comments.remove(&current, &id).await?;
    Ok(web::Json(MessageResponse::new("Comment deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{StateBuilder, actor, comment, ticket};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn call(state: HttpState, request: actix_test::TestRequest) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new().app_data(web::Data::new(state)).service(
                web::scope("/api/v1")
                    .service(add_comment)
                    .service(list_comments)
                    .service(edit_comment)
                    .service(delete_comment),
            ),
        )
        .await;
        let response = actix_test::call_service(
            &app,
            request
                .insert_header(("Authorization", "Bearer t"))
                .to_request(),
        )
        .await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&body).expect("json payload"))
    }

    #[rstest]
    #[actix_web::test]
    async fn add_returns_created_comment() {
        let ticket_id = *ticket(0x10, 1).id();
        let mut builder = StateBuilder::default().authenticate_as(actor(2, Role::Technician));
        builder
            .comments
            .expect_add()
            .withf(move |_, id, content| {
                *id == ticket_id && AsRef::<str>::as_ref(content) == "On it"
            })
            .times(1)
            .return_once(|_, _, _| Ok(comment(0x20, 0x10, 2)));

        let (status, value) = call(
            builder.build(),
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/tickets/{ticket_id}/comments"))
                .set_json(json!({ "content": "  On it " })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(value["message"], "Comment added successfully");
        assert_eq!(value["comment"]["ticketId"], ticket_id.to_string());
    }

    #[rstest]
    #[case(json!({}), "content is required")]
    #[case(json!({ "content": "   " }), "Comment content is required")]
    #[actix_web::test]
    async fn blank_content_is_rejected(#[case] payload: Value, #[case] message: &str) {
        let ticket_id = *ticket(0x10, 1).id();
        let state = StateBuilder::default()
            .authenticate_as(actor(2, Role::Client))
            .build();
        let (status, value) = call(
            state,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/tickets/{ticket_id}/comments"))
                .set_json(payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["message"], message);
        assert_eq!(value["details"]["field"], "content");
    }

    #[rstest]
    #[actix_web::test]
    async fn listing_keeps_service_order() {
        let ticket_id = *ticket(0x10, 1).id();
        let mut builder = StateBuilder::default().authenticate_as(actor(1, Role::Client));
        builder.comments.expect_list_for_ticket().return_once(|_, _| {
            Ok(vec![comment(0x20, 0x10, 1), comment(0x21, 0x10, 2)])
        });

        let (status, value) = call(
            builder.build(),
            actix_test::TestRequest::get().uri(&format!("/api/v1/tickets/{ticket_id}/comments")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = value["comments"]
            .as_array()
            .expect("comments array")
            .iter()
            .filter_map(|c| c["id"].as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                comment(0x20, 0x10, 1).id().to_string(),
                comment(0x21, 0x10, 2).id().to_string()
            ]
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_comment_id_names_comment() {
        let state = StateBuilder::default()
            .authenticate_as(actor(1, Role::Client))
            .build();
        let (status, value) = call(
            state,
            actix_test::TestRequest::put()
                .uri("/api/v1/comments/abc")
                .set_json(json!({ "content": "x" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["message"], "Invalid comment ID");
    }

    #[rstest]
    #[actix_web::test]
    async fn foreign_edit_is_forbidden() {
        let id = *comment(0x20, 0x10, 1).id();
        let mut builder = StateBuilder::default().authenticate_as(actor(2, Role::Admin));
        builder
            .comments
            .expect_edit()
            .return_once(|_, _, _| Err(Error::forbidden("You can only edit your own comments")));

        let (status, value) = call(
            builder.build(),
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/comments/{id}"))
                .set_json(json!({ "content": "rewritten" })),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(value["message"], "You can only edit your own comments");
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_confirms_with_message() {
        let id = *comment(0x20, 0x10, 1).id();
        let mut builder = StateBuilder::default().authenticate_as(actor(1, Role::Client));
        builder.comments.expect_remove().return_once(|_, _| Ok(()));

        let (status, value) = call(
            builder.build(),
            actix_test::TestRequest::delete().uri(&format!("/api/v1/comments/{id}")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["message"], "Comment deleted successfully");
    }
}
