//! Driving port for reading service orders.

use async_trait::async_trait;

use crate::domain::{Error, OrderFilter, OrderId, OrderSummary, ServiceOrder, SessionPrincipal};

/// Read side of the order book. Every call requires the view capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrdersQuery: Send + Sync {
    /// Orders passing `filter`, oldest first.
    async fn list_orders(
        &self,
        principal: &SessionPrincipal,
        filter: &OrderFilter,
    ) -> Result<Vec<ServiceOrder>, Error>;

    /// A single order; `NotFound` when absent.
    async fn get_order(
        &self,
        principal: &SessionPrincipal,
        id: &OrderId,
    ) -> Result<ServiceOrder, Error>;

    /// Per-status counts for the dashboard.
    async fn summary(&self, principal: &SessionPrincipal) -> Result<OrderSummary, Error>;
}
