//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod orders_command;
mod orders_query;
mod record_store;
mod service_order_repository;
mod system_user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use orders_command::MockOrdersCommand;
pub use orders_command::{ChangeStatusRequest, OrdersCommand};
#[cfg(test)]
pub use orders_query::MockOrdersQuery;
pub use orders_query::OrdersQuery;
pub use record_store::RecordStoreError;
#[cfg(test)]
pub use service_order_repository::MockServiceOrderRepository;
pub use service_order_repository::ServiceOrderRepository;
#[cfg(test)]
pub use system_user_repository::MockSystemUserRepository;
pub use system_user_repository::SystemUserRepository;
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
