//! End-to-end account flows: registration, login, authentication failures
//! and user administration.

#[path = "support/api.rs"]
mod api;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use helpdesk::domain::{RoleSource, TRACE_ID_HEADER};
use helpdesk::state_builders::ServiceOptions;
use helpdesk::test_support::{in_memory_state, in_memory_state_with};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;

use api::{authed, init_app, open_ticket, register, send};

#[rstest]
#[actix_web::test]
async fn registered_user_can_log_in_and_read_profile() {
    let app = init_app(in_memory_state()).await;
    let carol = register(&app, "Carol", "client").await;

    let (status, body) = send(
        &app,
        TestRequest::post().uri("/api/v1/users/login").set_json(json!({
            "email": "  CAROL@example.com ",
            "password": "correct horse",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["id"], carol.id.as_str());
    assert!(body["user"].get("passwordHash").is_none());
    let token = body["token"].as_str().expect("token").to_owned();

    let (status, body) = send(
        &app,
        authed(TestRequest::get().uri("/api/v1/users/profile"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "carol@example.com");
    assert_eq!(body["user"]["role"], "client");
}

#[rstest]
#[actix_web::test]
async fn role_defaults_to_client() {
    let app = init_app(in_memory_state()).await;

    let (status, body) = send(
        &app,
        TestRequest::post().uri("/api/v1/users/register").set_json(json!({
            "name": "Dee",
            "email": "dee@example.com",
            "password": "correct horse",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "client");
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_conflicts() {
    let app = init_app(in_memory_state()).await;
    register(&app, "Carol", "client").await;

    let (status, body) = send(
        &app,
        TestRequest::post().uri("/api/v1/users/register").set_json(json!({
            "name": "Another Carol",
            "email": "carol@example.com",
            "password": "different pass",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User already exists");
}

#[rstest]
#[case("carol@example.com", "wrong password")]
#[case("nobody@example.com", "correct horse")]
#[actix_web::test]
async fn login_failures_are_indistinguishable(#[case] email: &str, #[case] password: &str) {
    let app = init_app(in_memory_state()).await;
    register(&app, "Carol", "client").await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(json!({ "email": email, "password": password })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
}

#[rstest]
#[case(None, "missing_token")]
#[case(Some("Bearer not-a-jwt"), "invalid_token")]
#[actix_web::test]
async fn protected_routes_require_a_valid_token(
    #[case] header: Option<&str>,
    #[case] expected_code: &str,
) {
    let app = init_app(in_memory_state()).await;
    let mut request = TestRequest::get().uri("/api/v1/tickets");
    if let Some(value) = header {
        request = request.insert_header(("Authorization", value));
    }

    let response = actix_web::test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));
    let body: serde_json::Value = actix_web::test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["details"]["code"], expected_code);
}

#[rstest]
#[actix_web::test]
async fn admin_manages_users_but_not_themselves() {
    let app = init_app(in_memory_state()).await;
    let admin = register(&app, "Ada", "admin").await;
    let tech = register(&app, "Tariq", "technician").await;
    let client = register(&app, "Carol", "client").await;

    let (status, body) = send(&app, authed(TestRequest::get().uri("/api/v1/users"), &admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["users"][0]["id"], client.id.as_str());

    let (status, _) = send(&app, authed(TestRequest::get().uri("/api/v1/users"), &tech.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        authed(
            TestRequest::patch().uri(&format!("/api/v1/users/{}/role", admin.id)),
            &admin.token,
        )
        .set_json(json!({ "role": "client" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "self_action");

    let (status, body) = send(
        &app,
        authed(
            TestRequest::delete().uri(&format!("/api/v1/users/{}", admin.id)),
            &admin.token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "self_action");

    let (status, _) = send(
        &app,
        authed(
            TestRequest::delete().uri(&format!("/api/v1/users/{}", client.id)),
            &admin.token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        authed(TestRequest::get().uri("/api/v1/users/profile"), &client.token),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

async fn demote_then_read_activity(role_source: RoleSource) -> StatusCode {
    let options = ServiceOptions {
        role_source,
        ..ServiceOptions::default()
    };
    let app = init_app(in_memory_state_with(options, Arc::new(DefaultClock))).await;
    let admin = register(&app, "Ada", "admin").await;
    let tech = register(&app, "Tariq", "technician").await;
    let ticket_id = open_ticket(&app, &admin, "Shared drive full").await;

    let (status, body) = send(
        &app,
        authed(
            TestRequest::patch().uri(&format!("/api/v1/users/{}/role", tech.id)),
            &admin.token,
        )
        .set_json(json!({ "role": "client" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["role"], "client");

    let (status, _) = send(
        &app,
        authed(
            TestRequest::get().uri(&format!("/api/v1/activity/ticket/{ticket_id}")),
            &tech.token,
        ),
    )
    .await;
    status
}

#[rstest]
#[case(RoleSource::Store, StatusCode::FORBIDDEN)]
#[case(RoleSource::Token, StatusCode::OK)]
#[actix_web::test]
async fn role_changes_apply_according_to_role_source(
    #[case] role_source: RoleSource,
    #[case] expected: StatusCode,
) {
    assert_eq!(demote_then_read_activity(role_source).await, expected);
}
