//! Session and system user API handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"gestor@example.com","password":"..."}
//! POST /api/v1/logout
//! GET /api/v1/users/me
//! GET /api/v1/users?search=ana
//! GET|PUT|DELETE /api/v1/users/{id}
//! POST /api/v1/users
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    AccessLevel, Action, Capabilities, Email, Error, LoginCredentials, LoginValidationError,
    SessionPrincipal, SystemUser, SystemUserId, UserDraft, UserFilter, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_principal;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ID_FIELD, parse_id};

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "gestor@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// The signed-in principal with the capability row the UI uses to hide
/// actions the role cannot perform.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub id: SystemUserId,
    pub user_name: String,
    pub access_level: AccessLevel,
    pub capabilities: Capabilities,
}

impl From<SessionPrincipal> for CurrentUserResponse {
    fn from(principal: SessionPrincipal) -> Self {
        let capabilities = principal.capabilities();
        Self {
            id: principal.id,
            user_name: principal.user_name,
            access_level: principal.access_level,
            capabilities,
        }
    }
}

/// Public projection of a stored user. The credential digest never leaves
/// the backend.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: SystemUserId,
    pub user_name: String,
    pub email: Email,
    pub access_level: AccessLevel,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<SystemUser> for UserResponse {
    fn from(user: SystemUser) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
            email: user.email,
            access_level: user.access_level,
            is_active: user.is_active,
            phone_number: user.phone_number,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Body for creating or editing a user.
///
/// On create, omitted fields take their defaults (`USER`, active). On edit,
/// omitted fields keep the stored values and a blank password keeps the
/// current credential.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[schema(example = "Ana Souza")]
    pub user_name: String,
    #[schema(example = "ana@example.com")]
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub access_level: Option<AccessLevel>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl UserRequest {
    fn into_draft(self, current: Option<&SystemUser>) -> Result<UserDraft, UserValidationError> {
        let draft = UserDraft::try_new(&self.user_name, &self.email, self.password.as_deref())?;
        let access_level = self
            .access_level
            .or(current.map(|user| user.access_level))
            .unwrap_or_default();
        let is_active = self
            .is_active
            .or(current.map(|user| user.is_active))
            .unwrap_or(true);
        let phone_number = match self.phone_number {
            Some(phone) => Some(phone),
            None => current.and_then(|user| user.phone_number.clone()),
        };
        Ok(draft
            .with_access_level(access_level)
            .with_active(is_active)
            .with_phone_number(phone_number))
    }
}

/// Query parameters for `GET /api/v1/users`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Case-insensitive match on user name or email.
    pub search: Option<String>,
}

/// Authenticate a user and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = CurrentUserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["session"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<CurrentUserResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let principal = state.login.authenticate(&credentials).await?;
    session.persist_user(&principal.id)?;
    Ok(web::Json(principal.into()))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["session"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// The signed-in principal and its capabilities.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["session"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CurrentUserResponse>> {
    let principal = require_principal(&session, state.users.as_ref()).await?;
    Ok(web::Json(principal.into()))
}

/// List system users.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<UserListQuery>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let principal = require_principal(&session, state.users.as_ref()).await?;
    let filter = UserFilter::new(query.search.as_deref());
    let users = state.users.list_users(&principal, &filter).await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Fetch one system user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let principal = require_principal(&session, state.users.as_ref()).await?;
    let id: SystemUserId = parse_id(&path, ID_FIELD)?;
    let user = state.users.get_user(&principal, &id).await?;
    Ok(web::Json(user.into()))
}

/// Create a system user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Email already in use", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let principal = require_principal(&session, state.users.as_ref()).await?;
    let draft = payload.into_inner().into_draft(None)?;
    let created = state.users_command.create_user(&principal, draft).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(created)))
}

/// Edit a system user.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Email already in use", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let principal = require_principal(&session, state.users.as_ref()).await?;
    let id: SystemUserId = parse_id(&path, ID_FIELD)?;
    // Refuse before the lookup so non-managers cannot probe for ids.
    principal.require(Action::ManageUsers)?;
    let current = state.users.get_user(&principal, &id).await?;
    let draft = payload.into_inner().into_draft(Some(&current))?;
    let updated = state
        .users_command
        .update_user(&principal, &id, draft)
        .await?;
    Ok(web::Json(updated.into()))
}

/// Remove a system user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "User removed"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let principal = require_principal(&session, state.users.as_ref()).await?;
    let id: SystemUserId = parse_id(&path, ID_FIELD)?;
    state.users_command.delete_user(&principal, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
