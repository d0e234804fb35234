//! Driving port for changing service orders.
//!
//! Implementations check the caller's capability first, then the order
//! lifecycle, and only then write through the record store.

use async_trait::async_trait;

use crate::domain::{Error, OrderFields, OrderId, OrderStatus, ServiceOrder, SessionPrincipal};

/// Status change requested from the order detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeStatusRequest {
    pub status: OrderStatus,
    /// Replaces the stored technician name when present.
    pub technician_name: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrdersCommand: Send + Sync {
    /// Open a new order.
    async fn create_order(
        &self,
        principal: &SessionPrincipal,
        fields: OrderFields,
    ) -> Result<ServiceOrder, Error>;

    /// Replace the fields of an order that is not yet executed.
    async fn update_order(
        &self,
        principal: &SessionPrincipal,
        id: &OrderId,
        fields: OrderFields,
    ) -> Result<ServiceOrder, Error>;

    /// Move an order to another status.
    async fn change_status(
        &self,
        principal: &SessionPrincipal,
        id: &OrderId,
        request: ChangeStatusRequest,
    ) -> Result<ServiceOrder, Error>;

    /// Remove an order, executed or not.
    async fn delete_order(&self, principal: &SessionPrincipal, id: &OrderId) -> Result<(), Error>;
}
