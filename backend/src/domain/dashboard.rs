//! Dashboard summary of the order book.

use serde::Serialize;
use utoipa::ToSchema;

use super::order::{OrderStatus, ServiceOrder};

/// Total and per-status order counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub total: usize,
    pub scheduled: usize,
    pub executed: usize,
    pub pending: usize,
    pub late: usize,
}

impl OrderSummary {
    /// Count `orders` by status.
    #[must_use]
    pub fn from_orders(orders: &[ServiceOrder]) -> Self {
        orders.iter().fold(Self::default(), |mut summary, order| {
            summary.total += 1;
            match order.status {
                OrderStatus::Scheduled => summary.scheduled += 1,
                OrderStatus::Executed => summary.executed += 1,
                OrderStatus::Pending => summary.pending += 1,
                OrderStatus::Late => summary.late += 1,
            }
            summary
        })
    }
}
