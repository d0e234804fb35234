//! Driven port for the system user collection.
use async_trait::async_trait;

use crate::domain::{SystemUser, SystemUserId};

use super::RecordStoreError;

/// Persistence for [`SystemUser`] records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SystemUserRepository: Send + Sync {
    /// Every stored user, oldest first.
    async fn list(&self) -> Result<Vec<SystemUser>, RecordStoreError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &SystemUserId)
    -> Result<Option<SystemUser>, RecordStoreError>;

    /// Insert a new user.
    async fn create(&self, user: SystemUser) -> Result<SystemUser, RecordStoreError>;

    /// Replace an existing user; `NotFound` when it is gone.
    async fn update(&self, user: SystemUser) -> Result<SystemUser, RecordStoreError>;

    /// Remove a user; `NotFound` when it is gone.
    async fn delete(&self, id: &SystemUserId) -> Result<(), RecordStoreError>;
}
