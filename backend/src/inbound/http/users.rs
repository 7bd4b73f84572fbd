//! Users API handlers.
//!
//! ```text
//! POST /api/v1/users/register {"name":"Ada","email":"ada@example.com","password":"hunter2222"}
//! POST /api/v1/users/login {"email":"ada@example.com","password":"hunter2222"}
//! GET /api/v1/users/profile
//! GET /api/v1/users
//! GET /api/v1/users/{id}
//! PATCH /api/v1/users/{id}/role {"role":"technician"}
//! DELETE /api/v1/users/{id}
//! ```
//!
//! Register and login are public; everything else needs a bearer token.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AuthenticatedSession;
use crate::domain::{Error, LoginCredentials, Registration, Role, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentActor;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::envelope::MessageResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, login_validation_error, parse_choice, parse_id, require, user_validation_error,
};

const ROLE_FIELD: FieldName = FieldName::new("role");
const ROLES: [&str; 3] = ["client", "technician", "admin"];

/// Registration request body for `POST /api/v1/users/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "hunter2222")]
    pub password: Option<String>,
    /// Defaults to `client`.
    #[schema(example = "client")]
    pub role: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let name = require(value.name, FieldName::new("name"))?;
        let email = require(value.email, FieldName::new("email"))?;
        let password = require(value.password, FieldName::new("password"))?;
        let role = value
            .role
            .as_deref()
            .map(|raw| parse_choice::<Role>(raw, ROLE_FIELD, &ROLES))
            .transpose()?;
        Self::try_from_parts(&name, &email, &password, role).map_err(user_validation_error)
    }
}

/// Login request body for `POST /api/v1/users/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "hunter2222")]
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let email = require(value.email, FieldName::new("email"))?;
        let password = require(value.password, FieldName::new("password"))?;
        Self::try_from_parts(&email, &password).map_err(login_validation_error)
    }
}

/// Role change body for `PATCH /api/v1/users/{id}/role`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequest {
    #[schema(example = "technician")]
    pub role: Option<String>,
}

/// Public view of a user. Never carries the credential.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[schema(example = "client")]
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            role: user.role().as_str().to_owned(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// Envelope for register and login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub message: String,
    pub user: UserResponse,
    /// Bearer token for the `Authorization` header.
    pub token: String,
}

impl SessionResponse {
    fn new(message: &str, session: &AuthenticatedSession) -> Self {
        Self {
            message: message.to_owned(),
            user: UserResponse::from(&session.user),
            token: session.token.token.clone(),
        }
    }
}

/// Envelope for single-user responses.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserEnvelope {
    pub message: String,
    pub user: UserResponse,
}

impl UserEnvelope {
    fn new(message: &str, user: &User) -> Self {
        Self {
            message: message.to_owned(),
            user: user.into(),
        }
    }
}

/// Envelope for the user listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub message: String,
    pub count: usize,
    pub users: Vec<UserResponse>,
}

/// Create an account and return it with a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = SessionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let session = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(SessionResponse::new(
        "User registered successfully",
        &session,
    )))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let session = state.accounts.login(credentials).await?;
    Ok(HttpResponse::Ok().json(SessionResponse::new("Login successful", &session)))
}

/// The caller's own account.
#[utoipa::path(
    get,
    path = "/api/v1/users/profile",
    responses(
        (status = 200, description = "Profile", body = UserEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getProfile"
)]
#[get("/users/profile")]
pub async fn profile(
    state: web::Data<HttpState>,
    current: CurrentActor,
) -> ApiResult<web::Json<UserEnvelope>> {
    let user = state.users.profile(&current).await?;
    Ok(web::Json(UserEnvelope::new(
        "Profile retrieved successfully",
        &user,
    )))
}

/// List every account, newest first. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = UserListResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    current: CurrentActor,
) -> ApiResult<web::Json<UserListResponse>> {
    let users = state.users.list(&current).await?;
    let users: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    Ok(web::Json(UserListResponse {
        message: "Users retrieved successfully".to_owned(),
        count: users.len(),
        users,
    }))
}

/// Fetch one account. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserEnvelope),
        (status = 400, description = "Invalid user ID", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let id: UserId = parse_id(&path, "user")?;
    let user = state.users.get(&current, &id).await?;
    Ok(web::Json(UserEnvelope::new(
        "User retrieved successfully",
        &user,
    )))
}

/// Change another account's role. Admin only; never one's own.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/role",
    params(("id" = String, Path, description = "User identifier")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Role updated", body = UserEnvelope),
        (status = 400, description = "Invalid request or self-targeted change", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUserRole"
)]
#[patch("/users/{id}/role")]
pub async fn update_role(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
    payload: web::Json<RoleRequest>,
) -> ApiResult<web::Json<UserEnvelope>> {
    let id: UserId = parse_id(&path, "user")?;
    let raw = require(payload.into_inner().role, ROLE_FIELD)?;
    let role = parse_choice::<Role>(&raw, ROLE_FIELD, &ROLES)?;
    let user = state.users.change_role(&current, &id, role).await?;
    Ok(web::Json(UserEnvelope::new(
        "User role updated successfully",
        &user,
    )))
}

/// Delete another account. Admin only; never one's own.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Invalid ID or self-deletion", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    current: CurrentActor,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id: UserId = parse_id(&path, "user")?;
    state.users.delete(&current, &id).await?;
    Ok(web::Json(MessageResponse::new("User deleted successfully")))
}
