//! List filters for orders and users.
//!
//! Text search is a case-insensitive substring match; an absent or blank
//! term matches everything.

use super::order::{OrderStatus, ServiceOrder};
use super::system_user::SystemUser;

fn normalise(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Filter applied to order listings.
///
/// # Examples
/// ```
/// use ordens::domain::{OrderFilter, OrderStatus};
///
/// let filter = OrderFilter::new(Some(OrderStatus::Late), Some(" acme "));
/// assert_eq!(filter.status(), Some(OrderStatus::Late));
/// assert_eq!(filter.search(), Some("acme"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    status: Option<OrderStatus>,
    search: Option<String>,
}

impl OrderFilter {
    #[must_use]
    pub fn new(status: Option<OrderStatus>, search: Option<&str>) -> Self {
        Self {
            status,
            search: normalise(search),
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<OrderStatus> {
        self.status
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Whether `order` passes the filter.
    #[must_use]
    pub fn matches(&self, order: &ServiceOrder) -> bool {
        if self.status.is_some_and(|status| status != order.status) {
            return false;
        }
        self.search.as_deref().is_none_or(|term| {
            contains(&order.order_number, term)
                || contains(&order.client_name, term)
                || contains(&order.description, term)
        })
    }

    /// Keep the orders that pass the filter.
    #[must_use]
    pub fn apply(&self, orders: Vec<ServiceOrder>) -> Vec<ServiceOrder> {
        orders.into_iter().filter(|order| self.matches(order)).collect()
    }
}

/// Filter applied to user listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    search: Option<String>,
}

impl UserFilter {
    #[must_use]
    pub fn new(search: Option<&str>) -> Self {
        Self {
            search: normalise(search),
        }
    }

    /// Whether `user` passes the filter.
    #[must_use]
    pub fn matches(&self, user: &SystemUser) -> bool {
        self.search.as_deref().is_none_or(|term| {
            contains(&user.user_name, term) || contains(user.email.as_ref(), term)
        })
    }

    /// Keep the users that pass the filter.
    #[must_use]
    pub fn apply(&self, users: Vec<SystemUser>) -> Vec<SystemUser> {
        users.into_iter().filter(|user| self.matches(user)).collect()
    }
}
