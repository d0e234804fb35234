//! Dashboard summary handler.

use actix_web::{get, web};

use crate::domain::{Error, OrderSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_principal;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Order counts per status for the landing screen.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Order counts", body = OrderSummary),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["orders"],
    operation_id = "dashboard"
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<OrderSummary>> {
    let principal = require_principal(&session, state.users.as_ref()).await?;
    let summary = state.orders.summary(&principal).await?;
    Ok(web::Json(summary))
}
