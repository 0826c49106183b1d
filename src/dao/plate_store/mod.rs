/// CouchDB backend over its HTTP API.
#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod memory;
/// MongoDB backend.
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::PlateEntity;
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the document collection holding plate records.
pub trait PlateStore: Send + Sync {
    /// Short backend name used in logs and health responses.
    fn backend(&self) -> &'static str;
    /// Insert a new record and return the identifier generated by the store.
    fn add_plate(&self, plate: PlateEntity) -> BoxFuture<'static, StorageResult<String>>;
    /// Return every record whose `plate` field equals `plate`, in no particular order.
    fn find_by_plate(&self, plate: String) -> BoxFuture<'static, StorageResult<Vec<PlateEntity>>>;
    /// Cheap round trip proving the backend is reachable.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Rebuild the underlying connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
