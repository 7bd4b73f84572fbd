//! Shared helpers driving the full router over the in-memory store.

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use helpdesk::Trace;
use helpdesk::inbound::http::routes::api_scope;
use helpdesk::inbound::http::state::HttpState;
use serde_json::{Value, json};

pub(crate) async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(api_scope()),
    )
    .await
}

/// Status and JSON body of one call.
pub(crate) async fn send<S>(app: &S, request: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body: Value = test::read_body_json(response).await;
    (status, body)
}

pub(crate) fn authed(request: TestRequest, token: &str) -> TestRequest {
    request.insert_header(("Authorization", format!("Bearer {token}")))
}

/// A registered account: its id and bearer token.
#[derive(Debug, Clone)]
pub(crate) struct Account {
    pub(crate) id: String,
    pub(crate) token: String,
}

pub(crate) async fn register<S>(app: &S, name: &str, role: &str) -> Account
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        TestRequest::post().uri("/api/v1/users/register").set_json(json!({
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase()),
            "password": "correct horse",
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {name}: {body}");
    Account {
        id: body["user"]["id"].as_str().expect("user id").to_owned(),
        token: body["token"].as_str().expect("token").to_owned(),
    }
}

/// Open a ticket as `account` and return its id.
pub(crate) async fn open_ticket<S>(app: &S, account: &Account, title: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        authed(TestRequest::post().uri("/api/v1/tickets"), &account.token).set_json(json!({
            "title": title,
            "description": "Details to follow",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "open ticket: {body}");
    body["ticket"]["id"].as_str().expect("ticket id").to_owned()
}
