//! Driving port for user-facing queries.
//!
//! Inbound adapters use this port to resolve the session principal and to
//! list users without importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, SessionPrincipal, SystemUser, SystemUserId, UserFilter};

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Principal for a session's user id.
    ///
    /// `None` when the user no longer exists or has been deactivated.
    async fn resolve_principal(
        &self,
        id: &SystemUserId,
    ) -> Result<Option<SessionPrincipal>, Error>;

    /// Users passing `filter`, oldest first.
    async fn list_users(
        &self,
        principal: &SessionPrincipal,
        filter: &UserFilter,
    ) -> Result<Vec<SystemUser>, Error>;

    /// A single user; `NotFound` when absent.
    async fn get_user(
        &self,
        principal: &SessionPrincipal,
        id: &SystemUserId,
    ) -> Result<SystemUser, Error>;
}
