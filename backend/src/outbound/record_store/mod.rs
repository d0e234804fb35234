//! In-memory record store.
//!
//! Each collection is a `Vec` behind a `tokio` `RwLock`, kept in insertion
//! order. Writes to one collection are serialised; readers receive clones.
//! Timestamps come from an injected [`Clock`] so tests can pin them.
//!
//! The store implements both driven ports:
//! - [`ServiceOrderRepository`] for `InMemoryRecordStore<ServiceOrder>`;
//! - [`SystemUserRepository`] for `InMemoryRecordStore<SystemUser>`.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{RecordStoreError, ServiceOrderRepository, SystemUserRepository};
use crate::domain::{OrderId, ServiceOrder, SystemUser, SystemUserId};

/// A record kept by [`InMemoryRecordStore`].
pub trait StoredRecord: Clone + Send + Sync + 'static {
    type Id: PartialEq + fmt::Display + Send + Sync;

    /// Collection name used in logs.
    const COLLECTION: &'static str;

    fn id(&self) -> &Self::Id;

    fn created_at(&self) -> Option<DateTime<Utc>>;

    fn set_timestamps(&mut self, created_at: Option<DateTime<Utc>>, updated_at: DateTime<Utc>);
}

impl StoredRecord for ServiceOrder {
    type Id = OrderId;

    const COLLECTION: &'static str = "ordensdeservico";

    fn id(&self) -> &OrderId {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn set_timestamps(&mut self, created_at: Option<DateTime<Utc>>, updated_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = Some(updated_at);
    }
}

impl StoredRecord for SystemUser {
    type Id = SystemUserId;

    const COLLECTION: &'static str = "usuariosdosistema";

    fn id(&self) -> &SystemUserId {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn set_timestamps(&mut self, created_at: Option<DateTime<Utc>>, updated_at: DateTime<Utc>) {
        self.created_at = created_at;
        self.updated_at = Some(updated_at);
    }
}

/// One collection of records.
pub struct InMemoryRecordStore<T> {
    records: RwLock<Vec<T>>,
    clock: Arc<dyn Clock>,
}

/// Order collection.
pub type InMemoryServiceOrders = InMemoryRecordStore<ServiceOrder>;
/// User collection.
pub type InMemorySystemUsers = InMemoryRecordStore<SystemUser>;

impl<T> InMemoryRecordStore<T>
where
    T: StoredRecord,
{
    /// Create an empty collection.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_records(Vec::new(), clock)
    }

    /// Create a collection holding `records` as given.
    pub fn with_records(records: Vec<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: RwLock::new(records),
            clock,
        }
    }

    async fn all(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    async fn find(&self, id: &T::Id) -> Option<T> {
        self.records
            .read()
            .await
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    async fn insert(&self, mut record: T) -> Result<T, RecordStoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.id() == record.id()) {
            return Err(RecordStoreError::query(format!(
                "duplicate id {} in {}",
                record.id(),
                T::COLLECTION
            )));
        }
        let now = self.clock.utc();
        record.set_timestamps(Some(now), now);
        records.push(record.clone());
        debug!(collection = T::COLLECTION, id = %record.id(), "record created");
        Ok(record)
    }

    async fn replace(&self, mut record: T) -> Result<T, RecordStoreError> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|existing| existing.id() == record.id())
            .ok_or_else(|| RecordStoreError::not_found(record.id().to_string()))?;
        record.set_timestamps(slot.created_at(), self.clock.utc());
        *slot = record.clone();
        debug!(collection = T::COLLECTION, id = %record.id(), "record updated");
        Ok(record)
    }

    async fn remove(&self, id: &T::Id) -> Result<(), RecordStoreError> {
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| RecordStoreError::not_found(id.to_string()))?;
        records.remove(index);
        debug!(collection = T::COLLECTION, %id, "record deleted");
        Ok(())
    }
}

#[async_trait]
impl ServiceOrderRepository for InMemoryRecordStore<ServiceOrder> {
    async fn list(&self) -> Result<Vec<ServiceOrder>, RecordStoreError> {
        Ok(self.all().await)
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<ServiceOrder>, RecordStoreError> {
        Ok(self.find(id).await)
    }

    async fn create(&self, order: ServiceOrder) -> Result<ServiceOrder, RecordStoreError> {
        self.insert(order).await
    }

    async fn update(&self, order: ServiceOrder) -> Result<ServiceOrder, RecordStoreError> {
        self.replace(order).await
    }

    async fn delete(&self, id: &OrderId) -> Result<(), RecordStoreError> {
        self.remove(id).await
    }
}

#[async_trait]
impl SystemUserRepository for InMemoryRecordStore<SystemUser> {
    async fn list(&self) -> Result<Vec<SystemUser>, RecordStoreError> {
        Ok(self.all().await)
    }

    async fn find_by_id(
        &self,
        id: &SystemUserId,
    ) -> Result<Option<SystemUser>, RecordStoreError> {
        Ok(self.find(id).await)
    }

    async fn create(&self, user: SystemUser) -> Result<SystemUser, RecordStoreError> {
        self.insert(user).await
    }

    async fn update(&self, user: SystemUser) -> Result<SystemUser, RecordStoreError> {
        self.replace(user).await
    }

    async fn delete(&self, id: &SystemUserId) -> Result<(), RecordStoreError> {
        self.remove(id).await
    }
}
