//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use mockable::DefaultClock;

use crate::domain::{
    AccessLevel, HashCost, OrderFields, OrderId, OrderStatus, PasswordDigest, ServiceOrder,
    SystemUser, SystemUserId, UserDraft,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::record_store::{InMemoryServiceOrders, InMemorySystemUsers};

/// Password shared by every seeded test user.
pub const TEST_PASSWORD: &str = "s3nha-forte";

/// Build a session middleware configured for tests.
///
/// A fresh key is generated per invocation and the `Secure` flag is off so
/// cookies travel over plain HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the `session` cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Stored user with [`TEST_PASSWORD`] hashed cheaply.
pub fn seeded_user(name: &str, email: &str, access_level: AccessLevel) -> SystemUser {
    let draft = UserDraft::try_new(name, email, None)
        .expect("valid draft")
        .with_access_level(access_level);
    SystemUser::new(
        SystemUserId::random(),
        draft,
        PasswordDigest::hash_with(TEST_PASSWORD, HashCost::MINIMAL).expect("digest"),
    )
}

/// Stored order in the given status.
pub fn seeded_order(number: &str, client: &str, status: OrderStatus) -> ServiceOrder {
    let technician_name = (status == OrderStatus::Executed).then(|| "Carlos Silva".to_owned());
    ServiceOrder::new(
        OrderId::random(),
        OrderFields {
            order_number: number.into(),
            client_name: client.into(),
            description: "Manutenção preventiva".into(),
            status,
            technician_name,
            ..OrderFields::default()
        },
    )
    .expect("valid order")
}

/// One user per access level, named after the level.
pub fn staff() -> Vec<SystemUser> {
    AccessLevel::ALL
        .into_iter()
        .map(|level| {
            let name = level.as_str().to_lowercase();
            seeded_user(&name, &format!("{name}@example.com"), level)
        })
        .collect()
}

/// HTTP state backed by in-memory stores holding `users` and `orders`.
pub fn memory_state(users: Vec<SystemUser>, orders: Vec<ServiceOrder>) -> HttpState {
    let clock = Arc::new(DefaultClock);
    HttpState::from_repositories(
        Arc::new(InMemorySystemUsers::with_records(users, clock.clone())),
        Arc::new(InMemoryServiceOrders::with_records(orders, clock)),
    )
}
