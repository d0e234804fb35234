//! Live server harness and shared world for HTTP behaviour tests.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The server runs over in-memory stores
//! seeded with one user per access level and three orders. `WorldFixture`
//! stops the server even if a step panics.

use std::cell::RefCell;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite, time::Duration as CookieDuration};
use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use awc::Client;
use mockable::DefaultClock;
use ordens::Trace;
use ordens::domain::{
    AccessLevel, HashCost, OrderFields, OrderId, OrderStatus, PasswordDigest, ServiceOrder,
    SystemUser, SystemUserId, TRACE_ID_HEADER, UserDraft,
};
use ordens::inbound::http::api;
use ordens::inbound::http::state::HttpState;
use ordens::outbound::record_store::{InMemoryServiceOrders, InMemorySystemUsers};
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

/// Password of every seeded user.
pub(crate) const PASSWORD: &str = "s3nha-forte";

pub(crate) struct HttpWorld {
    runtime: Runtime,
    local: LocalSet,
    base_url: String,
    server: ServerHandle,
    pub(crate) orders: Vec<ServiceOrder>,
    pub(crate) session_cookie: Option<String>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_trace_id: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<HttpWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        // `LocalSet` must be driven on the thread that owns it.
        let ctx = self.world.borrow();
        let server = ctx.server.clone();
        ctx.local.block_on(&ctx.runtime, async move {
            server.stop(true).await;
        });
    }
}

/// Start a seeded server for one scenario.
pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let orders = seeded_orders();
    let state = memory_state(seeded_users(), orders.clone());
    let (base_url, server) = local
        .block_on(&runtime, spawn_server(state))
        .expect("spawn server");

    WorldFixture {
        world: Rc::new(RefCell::new(HttpWorld {
            runtime,
            local,
            base_url,
            server,
            orders,
            session_cookie: None,
            last_status: None,
            last_body: None,
            last_trace_id: None,
        })),
    }
}

fn seeded_users() -> Vec<SystemUser> {
    AccessLevel::ALL
        .into_iter()
        .map(|level| {
            let name = level.as_str().to_lowercase();
            let draft = UserDraft::try_new(&name, &format!("{name}@example.com"), None)
                .expect("valid draft")
                .with_access_level(level);
            SystemUser::new(
                SystemUserId::random(),
                draft,
                PasswordDigest::hash_with(PASSWORD, HashCost::MINIMAL).expect("digest"),
            )
        })
        .collect()
}

fn seeded_orders() -> Vec<ServiceOrder> {
    [
        ("OS-2024-001", "Metalúrgica Horizonte", OrderStatus::Scheduled),
        ("OS-2024-002", "Padaria Central", OrderStatus::Executed),
        ("OS-2024-003", "Hospital São Lucas", OrderStatus::Late),
    ]
    .into_iter()
    .map(|(number, client, status)| {
        ServiceOrder::new(
            OrderId::random(),
            OrderFields {
                order_number: number.to_owned(),
                client_name: client.to_owned(),
                description: "Manutenção preventiva do compressor".to_owned(),
                status,
                technician_name: (status == OrderStatus::Executed)
                    .then(|| "Carlos Silva".to_owned()),
                ..OrderFields::default()
            },
        )
        .expect("valid order")
    })
    .collect()
}

fn memory_state(users: Vec<SystemUser>, orders: Vec<ServiceOrder>) -> HttpState {
    let clock = Arc::new(DefaultClock);
    HttpState::from_repositories(
        Arc::new(InMemorySystemUsers::with_records(users, clock.clone())),
        Arc::new(InMemoryServiceOrders::with_records(orders, clock)),
    )
}

fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(PersistentSession::default().session_ttl(CookieDuration::hours(2)))
        .build()
}

async fn spawn_server(state: HttpState) -> Result<(String, ServerHandle), String> {
    let key = Key::generate();
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session_middleware(key.clone()))
                    .configure(api::configure),
            )
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

/// Id of the seeded order with `number`.
pub(crate) fn order_id(world: &SharedWorld, number: &str) -> String {
    world
        .borrow()
        .orders
        .iter()
        .find(|order| order.order_number == number)
        .map(|order| order.id.to_string())
        .unwrap_or_else(|| panic!("no seeded order {number}"))
}

/// Send a request, optionally with the stored session cookie, and record
/// the status, trace header, body and any new session cookie.
pub(crate) fn send(world: &SharedWorld, method: Method, path: &str, payload: Option<Value>) {
    let (base_url, cookie) = {
        let ctx = world.borrow();
        let cookie = ctx
            .session_cookie
            .as_deref()
            .and_then(|raw| raw.split(';').next())
            .map(str::to_owned);
        (ctx.base_url.clone(), cookie)
    };
    let url = format!("{base_url}{path}");

    let (status, trace_id, set_cookie, body) = {
        let ctx = world.borrow();
        ctx.local.block_on(&ctx.runtime, async move {
            let mut request = Client::default().request(method, url);
            if let Some(cookie) = cookie {
                request = request.insert_header((header::COOKIE, cookie));
            }
            let mut response = match payload {
                Some(payload) => request.send_json(&payload).await,
                None => request.send().await,
            }
            .expect("request sent");

            let status = response.status().as_u16();
            let header_value = |name: &str| {
                response
                    .headers()
                    .get(name)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_owned)
            };
            let trace_id = header_value(TRACE_ID_HEADER);
            let set_cookie = header_value(header::SET_COOKIE.as_str());
            let bytes = response.body().await.expect("response body");
            let body = if bytes.is_empty() {
                None
            } else {
                Some(serde_json::from_slice::<Value>(&bytes).expect("json body"))
            };
            (status, trace_id, set_cookie, body)
        })
    };

    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(status);
    ctx.last_trace_id = trace_id;
    ctx.last_body = body;
    if set_cookie.is_some() {
        ctx.session_cookie = set_cookie;
    }
}

/// Sign in and keep the session cookie for later requests.
pub(crate) fn sign_in(world: &SharedWorld, email: &str, password: &str) {
    send(
        world,
        Method::POST,
        "/api/v1/login",
        Some(serde_json::json!({ "email": email, "password": password })),
    );
}

/// Body of the last response.
pub(crate) fn last_body(world: &SharedWorld) -> Value {
    world.borrow().last_body.clone().expect("response body")
}
