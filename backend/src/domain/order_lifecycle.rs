//! Status state machine for service orders.
//!
//! Every status is reachable from every other. Two rules apply:
//!
//! - moving into [`OrderStatus::Executed`] requires a technician name;
//! - an executed order is locked and accepts neither edits nor further
//!   transitions. Only deletion removes it.
//!
//! Both checks are pure and never touch the record store.

use serde_json::json;

use super::Error;
use super::order::{OrderId, OrderStatus, OrderValidationError, ServiceOrder, TECHNICIAN_NAME_FIELD};

/// Raised when an edit or status change targets an executed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("order {id} is executed and can no longer change")]
pub struct OrderLocked {
    pub id: OrderId,
}

impl From<OrderLocked> for Error {
    fn from(locked: OrderLocked) -> Self {
        Error::conflict(locked.to_string()).with_details(json!({
            "code": "order_locked",
            "id": locked.id,
        }))
    }
}

/// Validate moving `order` from `current` to `proposed`.
///
/// `order` must already carry the technician name the caller intends to
/// store alongside the new status.
///
/// # Examples
/// ```
/// use ordens::domain::order_lifecycle::validate_transition;
/// use ordens::domain::{OrderFields, OrderId, OrderStatus, ServiceOrder};
///
/// let order = ServiceOrder::new(
///     OrderId::random(),
///     OrderFields {
///         order_number: "OS-7".into(),
///         client_name: "ACME".into(),
///         ..OrderFields::default()
///     },
/// )
/// .expect("valid order");
/// let result = validate_transition(OrderStatus::Pending, OrderStatus::Executed, &order);
/// assert!(result.is_err());
/// ```
pub fn validate_transition(
    _current: OrderStatus,
    proposed: OrderStatus,
    order: &ServiceOrder,
) -> Result<(), OrderValidationError> {
    if proposed != OrderStatus::Executed {
        return Ok(());
    }
    let named = order
        .technician_name
        .as_deref()
        .is_some_and(|name| !name.trim().is_empty());
    if named {
        Ok(())
    } else {
        Err(OrderValidationError::MissingField {
            field: TECHNICIAN_NAME_FIELD,
        })
    }
}

/// Whether `order` still accepts edits and status changes.
#[must_use]
pub fn is_editable(order: &ServiceOrder) -> bool {
    order.status != OrderStatus::Executed
}

/// Fail with [`OrderLocked`] unless `order` is editable.
pub fn ensure_editable(order: &ServiceOrder) -> Result<(), OrderLocked> {
    if is_editable(order) {
        Ok(())
    } else {
        Err(OrderLocked { id: order.id })
    }
}
