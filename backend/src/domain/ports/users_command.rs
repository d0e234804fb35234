//! Driving port for managing system users.

use async_trait::async_trait;

use crate::domain::{Error, SessionPrincipal, SystemUser, SystemUserId, UserDraft};

/// Write side of user management. Every call requires the manage-users
/// capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create a user; the draft must carry a password.
    async fn create_user(
        &self,
        principal: &SessionPrincipal,
        draft: UserDraft,
    ) -> Result<SystemUser, Error>;

    /// Replace a user's fields, rotating the password only when given.
    async fn update_user(
        &self,
        principal: &SessionPrincipal,
        id: &SystemUserId,
        draft: UserDraft,
    ) -> Result<SystemUser, Error>;

    /// Remove a user.
    async fn delete_user(
        &self,
        principal: &SessionPrincipal,
        id: &SystemUserId,
    ) -> Result<(), Error>;
}
