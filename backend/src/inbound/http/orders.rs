//! Service order API handlers.
//!
//! ```text
//! GET /api/v1/orders?status=PENDING&search=compressor
//! POST /api/v1/orders
//! GET|PUT|DELETE /api/v1/orders/{id}
//! POST /api/v1/orders/{id}/status {"status":"EXECUTED","technicianName":"Carlos Silva"}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::order_lifecycle::is_editable;
use crate::domain::ports::ChangeStatusRequest;
use crate::domain::{Error, OrderFields, OrderFilter, OrderId, OrderStatus, Priority, ServiceOrder};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_principal;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ID_FIELD, parse_id};

/// Order as returned to clients, with whether it still accepts edits.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: ServiceOrder,
    /// `false` once the order is executed.
    pub editable: bool,
}

impl From<ServiceOrder> for OrderResponse {
    fn from(order: ServiceOrder) -> Self {
        let editable = is_editable(&order);
        Self { order, editable }
    }
}

/// Body for creating or replacing an order.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[schema(example = "OS-2024-001")]
    pub order_number: String,
    #[schema(example = "Metalúrgica Horizonte")]
    pub client_name: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to `PENDING`.
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    /// Defaults to `MEDIUM`.
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub technician_name: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
}

impl From<OrderRequest> for OrderFields {
    fn from(value: OrderRequest) -> Self {
        Self {
            order_number: value.order_number,
            client_name: value.client_name,
            description: value.description,
            status: value.status.unwrap_or_default(),
            scheduled_date: value.scheduled_date,
            priority: value.priority.unwrap_or_default(),
            notes: value.notes,
            technician_name: value.technician_name,
            team: value.team,
        }
    }
}

/// Body for `POST /api/v1/orders/{id}/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequest {
    pub status: OrderStatus,
    /// Required, here or already on the order, when moving to `EXECUTED`.
    #[serde(default)]
    #[schema(example = "Carlos Silva")]
    pub technician_name: Option<String>,
}

impl From<StatusChangeRequest> for ChangeStatusRequest {
    fn from(value: StatusChangeRequest) -> Self {
        Self {
            status: value.status,
            technician_name: value.technician_name,
        }
    }
}

/// Query parameters for `GET /api/v1/orders`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    /// Only orders in this status.
    pub status: Option<OrderStatus>,
    /// Case-insensitive match on order number, client name or description.
    pub search: Option<String>,
}

/// List service orders.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders", body = [OrderResponse]),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<OrderListQuery>,
) -> ApiResult<web::Json<Vec<OrderResponse>>> {
    let principal = require_principal(&session, state.users.as_ref()).await?;
    let filter = OrderFilter::new(query.status, query.search.as_deref());
    let orders = state.orders.list_orders(&principal, &filter).await?;
    Ok(web::Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// Fetch one service order.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = OrderResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<OrderResponse>> {
    let principal = require_principal(&session, state.users.as_ref()).await?;
    let id: OrderId = parse_id(&path, ID_FIELD)?;
    let order = state.orders.get_order(&principal, &id).await?;
    Ok(web::Json(order.into()))
}

/// Open a service order.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = OrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/orders")]
pub async fn create_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<OrderRequest>,
) -> ApiResult<HttpResponse> {
    let principal = require_principal(&session, state.users.as_ref()).await?;
    let created = state
        .orders_command
        .create_order(&principal, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(created)))
}

/// Replace the fields of an order that is not yet executed.
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order id")),
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Order is executed", body = Error)
    ),
    tags = ["orders"],
    operation_id = "updateOrder"
)]
#[put("/orders/{id}")]
pub async fn update_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<OrderRequest>,
) -> ApiResult<web::Json<OrderResponse>> {
    let principal = require_principal(&session, state.users.as_ref()).await?;
    let id: OrderId = parse_id(&path, ID_FIELD)?;
    let updated = state
        .orders_command
        .update_order(&principal, &id, payload.into_inner().into())
        .await?;
    Ok(web::Json(updated.into()))
}

/// Move an order to another status.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/status",
    params(("id" = String, Path, description = "Order id")),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Status changed", body = OrderResponse),
        (status = 400, description = "Technician name missing", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Order is executed", body = Error)
    ),
    tags = ["orders"],
    operation_id = "changeOrderStatus"
)]
#[post("/orders/{id}/status")]
pub async fn change_order_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusChangeRequest>,
) -> ApiResult<web::Json<OrderResponse>> {
    let principal = require_principal(&session, state.users.as_ref()).await?;
    let id: OrderId = parse_id(&path, ID_FIELD)?;
    let updated = state
        .orders_command
        .change_status(&principal, &id, payload.into_inner().into())
        .await?;
    Ok(web::Json(updated.into()))
}

/// Remove an order. Executed orders may be removed too.
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order removed"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["orders"],
    operation_id = "deleteOrder"
)]
#[delete("/orders/{id}")]
pub async fn delete_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let principal = require_principal(&session, state.users.as_ref()).await?;
    let id: OrderId = parse_id(&path, ID_FIELD)?;
    state.orders_command.delete_order(&principal, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "orders_tests.rs"]
mod tests;
