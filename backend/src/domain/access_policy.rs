//! Role based access policy for service orders and system users.
//!
//! The policy is a fixed capability table indexed by [`AccessLevel`]. Every
//! check is a pure lookup: absence of permission is reported as `false` (or
//! [`PermissionDenied`] through [`require`]), never as a panic, and unknown
//! role names fail closed.
//!
//! | Role    | view | create | edit | status | delete | users |
//! |---------|------|--------|------|--------|--------|-------|
//! | MANAGER | yes  | yes    | yes  | yes    | yes    | yes   |
//! | ADMIN   | yes  | yes    | yes  | yes    | no     | yes   |
//! | ANALIST | yes  | no     | no   | yes    | no     | no    |
//! | USER    | yes  | yes    | no   | no     | no     | no    |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::Error;

/// Access level assigned to a system user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessLevel {
    /// Full control, including deleting orders.
    Manager,
    /// Manages orders and users but cannot delete orders.
    Admin,
    /// Reviews orders and moves them through their statuses.
    Analist,
    /// Opens new orders.
    #[default]
    User,
}

impl AccessLevel {
    /// Every access level, in descending order of privilege.
    pub const ALL: [Self; 4] = [Self::Manager, Self::Admin, Self::Analist, Self::User];

    /// Wire name of the access level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "MANAGER",
            Self::Admin => "ADMIN",
            Self::Analist => "ANALIST",
            Self::User => "USER",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a role name is not one of the known access levels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown access level: {0}")]
pub struct UnknownAccessLevel(pub String);

impl FromStr for AccessLevel {
    type Err = UnknownAccessLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownAccessLevel(s.to_owned()))
    }
}

/// Operation a caller may attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// List and read service orders.
    ViewOrders,
    /// Open a new service order.
    CreateOrder,
    /// Edit the fields of an order that is not yet executed.
    EditOrder,
    /// Move an order to another status.
    ChangeOrderStatus,
    /// Remove an order, executed or not.
    DeleteOrder,
    /// Create, edit and remove system users.
    ManageUsers,
}

impl Action {
    /// Every action known to the policy.
    pub const ALL: [Self; 6] = [
        Self::ViewOrders,
        Self::CreateOrder,
        Self::EditOrder,
        Self::ChangeOrderStatus,
        Self::DeleteOrder,
        Self::ManageUsers,
    ];

    /// Machine-readable action name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViewOrders => "view_orders",
            Self::CreateOrder => "create_order",
            Self::EditOrder => "edit_order",
            Self::ChangeOrderStatus => "change_order_status",
            Self::DeleteOrder => "delete_order",
            Self::ManageUsers => "manage_users",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub view_orders: bool,
    pub create_order: bool,
    pub edit_order: bool,
    pub change_order_status: bool,
    pub delete_order: bool,
    pub manage_users: bool,
}

impl Capabilities {
    /// Row granted to callers whose role cannot be resolved.
    pub const NONE: Self = Self {
        view_orders: false,
        create_order: false,
        edit_order: false,
        change_order_status: false,
        delete_order: false,
        manage_users: false,
    };

    /// Whether this row grants `action`.
    #[must_use]
    pub const fn allows(self, action: Action) -> bool {
        match action {
            Action::ViewOrders => self.view_orders,
            Action::CreateOrder => self.create_order,
            Action::EditOrder => self.edit_order,
            Action::ChangeOrderStatus => self.change_order_status,
            Action::DeleteOrder => self.delete_order,
            Action::ManageUsers => self.manage_users,
        }
    }
}

/// Returned by [`require`] when a role lacks a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("access level {role} may not {action}")]
pub struct PermissionDenied {
    pub role: AccessLevel,
    pub action: Action,
}

impl From<PermissionDenied> for Error {
    fn from(denied: PermissionDenied) -> Self {
        Error::forbidden(denied.to_string()).with_details(json!({
            "accessLevel": denied.role,
            "action": denied.action,
        }))
    }
}

/// Capability row for `role`.
#[must_use]
pub const fn capabilities(role: AccessLevel) -> Capabilities {
    match role {
        AccessLevel::Manager => Capabilities {
            view_orders: true,
            create_order: true,
            edit_order: true,
            change_order_status: true,
            delete_order: true,
            manage_users: true,
        },
        AccessLevel::Admin => Capabilities {
            view_orders: true,
            create_order: true,
            edit_order: true,
            change_order_status: true,
            delete_order: false,
            manage_users: true,
        },
        AccessLevel::Analist => Capabilities {
            view_orders: true,
            create_order: false,
            edit_order: false,
            change_order_status: true,
            delete_order: false,
            manage_users: false,
        },
        AccessLevel::User => Capabilities {
            view_orders: true,
            create_order: true,
            edit_order: false,
            change_order_status: false,
            delete_order: false,
            manage_users: false,
        },
    }
}

/// Whether `role` may perform `action`.
///
/// # Examples
/// ```
/// use ordens::domain::access_policy::{can_perform, Action};
/// use ordens::domain::AccessLevel;
///
/// assert!(!can_perform(AccessLevel::Analist, Action::CreateOrder));
/// assert!(can_perform(AccessLevel::Analist, Action::ChangeOrderStatus));
/// ```
#[must_use]
pub const fn can_perform(role: AccessLevel, action: Action) -> bool {
    capabilities(role).allows(action)
}

/// String entry point for roles read from untyped sources.
///
/// Unknown role names are granted nothing.
#[must_use]
pub fn can_perform_named(role: &str, action: Action) -> bool {
    role.parse::<AccessLevel>()
        .map(|level| can_perform(level, action))
        .unwrap_or(false)
}

/// Check `action` for `role`, returning [`PermissionDenied`] when refused.
pub fn require(role: AccessLevel, action: Action) -> Result<(), PermissionDenied> {
    if can_perform(role, action) {
        Ok(())
    } else {
        Err(PermissionDenied { role, action })
    }
}

/// Returned by [`require_grant`] when a role touches manager accounts
/// without being a manager itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("access level {role} may not assign or modify {target} accounts")]
pub struct GrantDenied {
    pub role: AccessLevel,
    pub target: AccessLevel,
}

impl From<GrantDenied> for Error {
    fn from(denied: GrantDenied) -> Self {
        Error::forbidden(denied.to_string()).with_details(json!({
            "accessLevel": denied.role,
            "target": denied.target,
        }))
    }
}

/// Whether `role` may give an account the `target` level, or edit an
/// account that already holds it. Manager accounts are reserved to managers.
#[must_use]
pub const fn can_grant(role: AccessLevel, target: AccessLevel) -> bool {
    !matches!(target, AccessLevel::Manager) || matches!(role, AccessLevel::Manager)
}

/// Check [`can_grant`], returning [`GrantDenied`] when refused.
pub fn require_grant(role: AccessLevel, target: AccessLevel) -> Result<(), GrantDenied> {
    if can_grant(role, target) {
        Ok(())
    } else {
        Err(GrantDenied { role, target })
    }
}
