//! In-process plate store used for local development and tests.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dao::{
    models::PlateEntity,
    plate_store::PlateStore,
    storage::{StorageError, StorageResult},
};

/// Failures reported by [`MemoryPlateStore`].
#[derive(Debug, Error)]
pub enum MemoryStoreError {
    /// The store was switched offline with [`MemoryPlateStore::set_offline`].
    #[error("in-memory plate store is offline")]
    Offline,
}

impl From<MemoryStoreError> for StorageError {
    fn from(err: MemoryStoreError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}

/// Plate store keeping documents in a vector, keyed by a generated UUID.
#[derive(Clone, Default)]
pub struct MemoryPlateStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    documents: RwLock<Vec<(String, PlateEntity)>>,
    offline: AtomicBool,
    writes: AtomicUsize,
    reads: AtomicUsize,
}

impl MemoryPlateStore {
    /// Create an empty, online store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail until switched back online.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of insert operations attempted against the store.
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Number of lookup operations attempted against the store.
    pub fn read_count(&self) -> usize {
        self.inner.reads.load(Ordering::SeqCst)
    }

    /// Snapshot of every stored document with its identifier.
    pub async fn documents(&self) -> Vec<(String, PlateEntity)> {
        self.inner.documents.read().await.clone()
    }

    fn ensure_online(&self) -> Result<(), MemoryStoreError> {
        if self.inner.offline.load(Ordering::SeqCst) {
            Err(MemoryStoreError::Offline)
        } else {
            Ok(())
        }
    }

    async fn insert(&self, plate: PlateEntity) -> Result<String, MemoryStoreError> {
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        self.ensure_online()?;
        let id = Uuid::new_v4().simple().to_string();
        self.inner.documents.write().await.push((id.clone(), plate));
        Ok(id)
    }

    async fn find(&self, plate: &str) -> Result<Vec<PlateEntity>, MemoryStoreError> {
        self.inner.reads.fetch_add(1, Ordering::SeqCst);
        self.ensure_online()?;
        let guard = self.inner.documents.read().await;
        Ok(guard
            .iter()
            .filter(|(_, entity)| entity.plate == plate)
            .map(|(_, entity)| entity.clone())
            .collect())
    }
}

impl PlateStore for MemoryPlateStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn add_plate(&self, plate: PlateEntity) -> BoxFuture<'static, StorageResult<String>> {
        let store = self.clone();
        Box::pin(async move { store.insert(plate).await.map_err(Into::into) })
    }

    fn find_by_plate(&self, plate: String) -> BoxFuture<'static, StorageResult<Vec<PlateEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find(&plate).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_online().map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_online().map_err(Into::into) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn find_returns_only_matching_plates() {
        let store = MemoryPlateStore::new();
        let first = store.add_plate(PlateEntity::new("ABC-1234")).await.unwrap();
        let second = store.add_plate(PlateEntity::new("XYZ-9876")).await.unwrap();
        assert_ne!(first, second);

        let found = store.find_by_plate("ABC-1234".into()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].plate, "ABC-1234");
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.read_count(), 1);
    }

    #[tokio::test]
    async fn offline_store_rejects_operations() {
        let store = MemoryPlateStore::new();
        store.set_offline(true);

        assert!(store.add_plate(PlateEntity::new("ABC-1234")).await.is_err());
        assert!(store.find_by_plate("ABC-1234".into()).await.is_err());
        assert!(store.health_check().await.is_err());
        assert!(store.documents().await.is_empty());

        store.set_offline(false);
        assert!(store.health_check().await.is_ok());
    }
}
