//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    LoginService, OrdersCommand, OrdersQuery, ServiceOrderRepository, SystemUserRepository,
    UsersCommand, UsersQuery,
};
use crate::domain::{CredentialLoginService, ServiceOrderService, SystemUserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub orders: Arc<dyn OrdersQuery>,
    pub orders_command: Arc<dyn OrdersCommand>,
}

impl HttpState {
    /// Wire the domain services over the two record store collections.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use ordens::inbound::http::state::HttpState;
    /// use ordens::outbound::record_store::{InMemoryServiceOrders, InMemorySystemUsers};
    ///
    /// let state = HttpState::from_repositories(
    ///     Arc::new(InMemorySystemUsers::new(Arc::new(DefaultClock))),
    ///     Arc::new(InMemoryServiceOrders::new(Arc::new(DefaultClock))),
    /// );
    /// let _orders = state.orders.clone();
    /// ```
    pub fn from_repositories<U, O>(users: Arc<U>, orders: Arc<O>) -> Self
    where
        U: SystemUserRepository + 'static,
        O: ServiceOrderRepository + 'static,
    {
        let user_service = Arc::new(SystemUserService::new(users.clone()));
        let order_service = Arc::new(ServiceOrderService::new(orders));
        Self {
            login: Arc::new(CredentialLoginService::new(users)),
            users: user_service.clone(),
            users_command: user_service,
            orders: order_service.clone(),
            orders_command: order_service,
        }
    }
}
