//! Route table for the versioned REST API.
//!
//! `/users/profile` is registered ahead of `/users/{id}` so the literal
//! segment wins.

use actix_web::{Scope, web};
use serde_json::json;

use crate::domain::Error;
use crate::inbound::http::activity::ticket_activity;
use crate::inbound::http::comments::{add_comment, delete_comment, edit_comment, list_comments};
use crate::inbound::http::tickets::{
    assign_ticket, create_ticket, delete_ticket, get_ticket, list_tickets, reopen_ticket,
    update_ticket,
};
use crate::inbound::http::users::{
    delete_user, get_user, list_users, login, profile, register, update_role,
};

/// Prefix shared by every API route.
pub const API_PREFIX: &str = "/api/v1";

/// Malformed JSON bodies become `invalid_request` errors in the usual shape.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request("Request body must be valid JSON")
            .with_details(json!({ "code": "invalid_json", "reason": err.to_string() }))
            .into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request("Query string is malformed")
            .with_details(json!({ "code": "invalid_query", "reason": err.to_string() }))
            .into()
    })
}

/// Build the `/api/v1` scope with every handler registered.
pub fn api_scope() -> Scope {
    web::scope(API_PREFIX)
        .app_data(json_config())
        .app_data(query_config())
        .service(register)
        .service(login)
        .service(profile)
        .service(list_users)
        .service(get_user)
        .service(update_role)
        .service(delete_user)
        .service(create_ticket)
        .service(list_tickets)
        .service(get_ticket)
        .service(update_ticket)
        .service(delete_ticket)
        .service(assign_ticket)
        .service(reopen_ticket)
        .service(add_comment)
        .service(list_comments)
        .service(edit_comment)
        .service(delete_comment)
        .service(ticket_activity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{StateBuilder, actor, user};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_uses_error_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(StateBuilder::default().build()))
                .service(api_scope()),
        )
        .await;
        let request = test::TestRequest::post()
            .uri("/api/v1/users/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = test::read_body_json(response).await;
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["details"]["code"], "invalid_json");
    }

    #[rstest]
    #[actix_web::test]
    async fn profile_route_wins_over_user_id() {
        let mut builder = StateBuilder::default().authenticate_as(actor(5, Role::Technician));
        builder
            .users
            .expect_profile()
            .times(1)
            .return_once(|_| Ok(user(5, Role::Technician)));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(builder.build()))
                .service(api_scope()),
        )
        .await;
        let request = test::TestRequest::get()
            .uri("/api/v1/users/profile")
            .insert_header(("Authorization", "Bearer t"))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
    }
}
