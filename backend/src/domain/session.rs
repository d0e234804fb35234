//! The authenticated caller, as resolved for one request.

use serde::Serialize;
use utoipa::ToSchema;

use super::access_policy::{self, AccessLevel, Action, Capabilities, PermissionDenied};
use super::system_user::{SystemUser, SystemUserId};

/// Identity and role of the signed-in user.
///
/// Built fresh from the user store on every request, so role changes and
/// deactivation take effect without waiting for the session to expire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionPrincipal {
    pub id: SystemUserId,
    pub user_name: String,
    pub access_level: AccessLevel,
}

impl SessionPrincipal {
    /// Project the principal out of a stored user.
    #[must_use]
    pub fn from_user(user: &SystemUser) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name.clone(),
            access_level: user.access_level,
        }
    }

    /// Whether the principal's role allows `action`.
    #[must_use]
    pub const fn can(&self, action: Action) -> bool {
        access_policy::can_perform(self.access_level, action)
    }

    /// Fail with [`PermissionDenied`] unless the role allows `action`.
    pub fn require(&self, action: Action) -> Result<(), PermissionDenied> {
        access_policy::require(self.access_level, action)
    }

    /// Full capability row for the principal's role.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        access_policy::capabilities(self.access_level)
    }
}
