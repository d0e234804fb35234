//! Route table for the `/api/v1` scope.

use actix_web::web;

use crate::inbound::http::dashboard::dashboard;
use crate::inbound::http::orders::{
    change_order_status, create_order, delete_order, get_order, list_orders, update_order,
};
use crate::inbound::http::users::{
    create_user, current_user, delete_user, get_user, list_users, login, logout, update_user,
};
use crate::inbound::http::validation::{json_config, query_config};

/// Register every API handler and the extractor error handlers.
///
/// Mount inside a scope that carries the session middleware:
///
/// ```rust,no_run
/// use actix_web::{App, web};
/// use ordens::inbound::http::api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(api::configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(login)
        .service(logout)
        // `/users/me` must precede `/users/{id}`.
        .service(current_user)
        .service(list_users)
        .service(get_user)
        .service(create_user)
        .service(update_user)
        .service(delete_user)
        .service(list_orders)
        .service(get_order)
        .service(create_order)
        .service(update_order)
        .service(change_order_status)
        .service(delete_order)
        .service(dashboard);
}
