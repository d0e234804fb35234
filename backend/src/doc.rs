//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api/v1`, the health probes and
//! the schemas they exchange. Domain types derive `ToSchema` directly; the
//! inbound DTOs add the request and response shapes.
//!
//! The document backs Swagger UI (debug builds) and is printed by
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    AccessLevel, Capabilities, Error, ErrorCode, OrderStatus, OrderSummary, Priority,
    ServiceOrder,
};
use crate::inbound::http::orders::{OrderRequest, OrderResponse, StatusChangeRequest};
use crate::inbound::http::users::{CurrentUserResponse, LoginRequest, UserRequest, UserResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Ordens de serviço API",
        description = "Service order tracking with role-based access for field maintenance teams."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::orders::list_orders,
        crate::inbound::http::orders::get_order,
        crate::inbound::http::orders::create_order,
        crate::inbound::http::orders::update_order,
        crate::inbound::http::orders::change_order_status,
        crate::inbound::http::orders::delete_order,
        crate::inbound::http::dashboard::dashboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        AccessLevel,
        Capabilities,
        ServiceOrder,
        OrderStatus,
        Priority,
        OrderSummary,
        LoginRequest,
        CurrentUserResponse,
        UserRequest,
        UserResponse,
        OrderRequest,
        OrderResponse,
        StatusChangeRequest,
    )),
    tags(
        (name = "session", description = "Sign-in, sign-out and the current principal"),
        (name = "users", description = "User administration"),
        (name = "orders", description = "Service orders and their lifecycle"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
