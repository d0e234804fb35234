//! Tests for service order handlers.

use super::*;
use crate::domain::{ErrorCode, SystemUser};
use crate::inbound::http::test_utils::{
    TEST_PASSWORD, memory_state, seeded_order, session_cookie, staff, test_session_middleware,
};
use crate::inbound::http::users::{LoginRequest, login};
use crate::inbound::http::validation::{json_config, query_config};
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

struct Fixture {
    users: Vec<SystemUser>,
    scheduled: ServiceOrder,
    executed: ServiceOrder,
    late: ServiceOrder,
}

#[fixture]
fn fixture() -> Fixture {
    Fixture {
        users: staff(),
        scheduled: seeded_order("OS-2024-001", "Metalúrgica Horizonte", OrderStatus::Scheduled),
        executed: seeded_order("OS-2024-002", "Usina Vale Verde", OrderStatus::Executed),
        late: seeded_order("OS-2024-003", "Padaria Central", OrderStatus::Late),
    }
}

impl Fixture {
    fn state(&self) -> HttpState {
        memory_state(
            self.users.clone(),
            vec![
                self.scheduled.clone(),
                self.executed.clone(),
                self.late.clone(),
            ],
        )
    }
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .app_data(query_config())
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(login)
                .service(list_orders)
                .service(get_order)
                .service(create_order)
                .service(update_order)
                .service(change_order_status)
                .service(delete_order),
        )
}

async fn login_as<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(LoginRequest {
                email: email.into(),
                password: TEST_PASSWORD.into(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "login as {email}");
    session_cookie(&res)
}

fn new_order() -> OrderRequest {
    OrderRequest {
        order_number: "OS-2024-010".into(),
        client_name: "Oficina Rápida".into(),
        description: "Troca de filtro".into(),
        ..OrderRequest::default()
    }
}

#[rstest]
#[actix_web::test]
async fn analists_cannot_open_orders(fixture: Fixture) {
    let app = actix_test::init_service(test_app(fixture.state())).await;
    let cookie = login_as(&app, "analist@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/orders")
            .cookie(cookie)
            .set_json(new_order())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let error: Error = actix_test::read_body_json(res).await;
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[actix_web::test]
async fn users_open_pending_orders(fixture: Fixture) {
    let app = actix_test::init_service(test_app(fixture.state())).await;
    let cookie = login_as(&app, "user@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/orders")
            .cookie(cookie)
            .set_json(new_order())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["priority"], "MEDIUM");
    assert_eq!(body["editable"], true);
    assert!(body["createdAt"].is_string());
}

#[rstest]
#[actix_web::test]
async fn blank_client_name_is_rejected(fixture: Fixture) {
    let app = actix_test::init_service(test_app(fixture.state())).await;
    let cookie = login_as(&app, "manager@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/orders")
            .cookie(cookie)
            .set_json(OrderRequest {
                client_name: "   ".into(),
                ..new_order()
            })
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: Error = actix_test::read_body_json(res).await;
    assert_eq!(error.details(), Some(&json!({ "field": "clientName" })));
}

#[rstest]
#[case("/api/v1/orders?status=LATE", &["OS-2024-003"])]
#[case("/api/v1/orders?status=ATRASADO", &["OS-2024-003"])]
#[case("/api/v1/orders?search=usina", &["OS-2024-002"])]
#[case("/api/v1/orders?search=MANUTEN%C3%87%C3%83O", &["OS-2024-001", "OS-2024-002", "OS-2024-003"])]
#[case("/api/v1/orders?status=PENDING", &[])]
#[actix_web::test]
async fn list_applies_filters(fixture: Fixture, #[case] uri: &str, #[case] expected: &[&str]) {
    let app = actix_test::init_service(test_app(fixture.state())).await;
    let cookie = login_as(&app, "user@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(uri)
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Vec<Value> = actix_test::read_body_json(res).await;
    let numbers: Vec<&str> = body
        .iter()
        .filter_map(|order| order["orderNumber"].as_str())
        .collect();
    assert_eq!(numbers, expected);
}

#[rstest]
#[actix_web::test]
async fn unknown_status_filter_is_an_invalid_request(fixture: Fixture) {
    let app = actix_test::init_service(test_app(fixture.state())).await;
    let cookie = login_as(&app, "user@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/orders?status=DONE")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn detail_reports_editability(fixture: Fixture) {
    let executed_id = fixture.executed.id;
    let app = actix_test::init_service(test_app(fixture.state())).await;
    let cookie = login_as(&app, "analist@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/orders/{executed_id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: OrderResponse = actix_test::read_body_json(res).await;
    assert!(!body.editable);
    assert_eq!(body.order.technician_name.as_deref(), Some("Carlos Silva"));
}

#[rstest]
#[actix_web::test]
async fn missing_orders_are_not_found(fixture: Fixture) {
    let app = actix_test::init_service(test_app(fixture.state())).await;
    let cookie = login_as(&app, "user@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/orders/{}", OrderId::random()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn executed_orders_reject_edits_from_managers(fixture: Fixture) {
    let executed = fixture.executed.clone();
    let app = actix_test::init_service(test_app(fixture.state())).await;
    let cookie = login_as(&app, "manager@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/orders/{}", executed.id))
            .cookie(cookie)
            .set_json(OrderRequest {
                order_number: executed.order_number,
                client_name: executed.client_name,
                notes: Some("ajuste".into()),
                ..OrderRequest::default()
            })
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn users_cannot_edit_orders(fixture: Fixture) {
    let scheduled_id = fixture.scheduled.id;
    let app = actix_test::init_service(test_app(fixture.state())).await;
    let cookie = login_as(&app, "user@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/orders/{scheduled_id}"))
            .cookie(cookie)
            .set_json(new_order())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn admins_edit_open_orders(fixture: Fixture) {
    let scheduled_id = fixture.scheduled.id;
    let app = actix_test::init_service(test_app(fixture.state())).await;
    let cookie = login_as(&app, "admin@example.com").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/orders/{scheduled_id}"))
            .cookie(cookie)
            .set_json(OrderRequest {
                status: Some(OrderStatus::Scheduled),
                priority: Some(Priority::Urgent),
                ..new_order()
            })
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["id"], scheduled_id.to_string());
    assert_eq!(body["priority"], "URGENT");
    assert_eq!(body["clientName"], "Oficina Rápida");
}

#[rstest]
#[actix_web::test]
async fn analist_executes_then_order_locks(fixture: Fixture) {
    let scheduled_id = fixture.scheduled.id;
    let app = actix_test::init_service(test_app(fixture.state())).await;
    let cookie = login_as(&app, "analist@example.com").await;
    let status_uri = format!("/api/v1/orders/{scheduled_id}/status");

    let missing = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&status_uri)
            .cookie(cookie.clone())
            .set_json(json!({ "status": "EXECUTED" }))
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    let error: Error = actix_test::read_body_json(missing).await;
    assert_eq!(error.details(), Some(&json!({ "field": "technicianName" })));

    let executed = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&status_uri)
            .cookie(cookie.clone())
            .set_json(StatusChangeRequest {
                status: OrderStatus::Executed,
                technician_name: Some("Carlos Silva".into()),
            })
            .to_request(),
    )
    .await;
    assert_eq!(executed.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(executed).await;
    assert_eq!(body["status"], "EXECUTED");
    assert_eq!(body["technicianName"], "Carlos Silva");
    assert_eq!(body["editable"], false);

    let reopened = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&status_uri)
            .cookie(cookie)
            .set_json(json!({ "status": "PENDING" }))
            .to_request(),
    )
    .await;
    assert_eq!(reopened.status(), StatusCode::CONFLICT);
}

#[rstest]
#[case("manager@example.com", StatusCode::NO_CONTENT)]
#[case("admin@example.com", StatusCode::FORBIDDEN)]
#[case("analist@example.com", StatusCode::FORBIDDEN)]
#[case("user@example.com", StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn only_managers_delete_executed_orders(
    fixture: Fixture,
    #[case] email: &str,
    #[case] expected: StatusCode,
) {
    let executed_id = fixture.executed.id;
    let app = actix_test::init_service(test_app(fixture.state())).await;
    let cookie = login_as(&app, email).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/orders/{executed_id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), expected);
}
