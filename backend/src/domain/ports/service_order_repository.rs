//! Driven port for the service order collection.
use async_trait::async_trait;

use crate::domain::{OrderId, ServiceOrder};

use super::RecordStoreError;

/// Persistence for [`ServiceOrder`] records.
///
/// Adapters assign `created_at` on create and `updated_at` on every write,
/// and return the record as stored.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceOrderRepository: Send + Sync {
    /// Every stored order, oldest first.
    async fn list(&self) -> Result<Vec<ServiceOrder>, RecordStoreError>;

    /// Fetch an order by identifier.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<ServiceOrder>, RecordStoreError>;

    /// Insert a new order.
    async fn create(&self, order: ServiceOrder) -> Result<ServiceOrder, RecordStoreError>;

    /// Replace an existing order; `NotFound` when it is gone.
    async fn update(&self, order: ServiceOrder) -> Result<ServiceOrder, RecordStoreError>;

    /// Remove an order; `NotFound` when it is gone.
    async fn delete(&self, id: &OrderId) -> Result<(), RecordStoreError>;
}
