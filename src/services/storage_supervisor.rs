use std::{future::Future, sync::Arc, time::Duration};

use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    config::{AppConfig, StoreBackend},
    dao::{
        plate_store::{PlateStore, memory::MemoryPlateStore},
        storage::StorageError,
    },
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Raised when the configured backend was left out of the build.
#[derive(Debug, Error)]
#[error("storage backend `{0}` is not compiled into this binary")]
pub struct BackendDisabled(pub StoreBackend);

/// Connect the backend selected in `config` and return it as a shared [`PlateStore`].
pub async fn connect_store(config: &AppConfig) -> Result<Arc<dyn PlateStore>, StorageError> {
    match config.store() {
        #[cfg(feature = "mongo-store")]
        StoreBackend::Mongo => {
            use crate::dao::plate_store::mongodb::{MongoConfig, MongoPlateStore};

            let mongo_config = MongoConfig::from_env(config.collection()).await?;
            let store = MongoPlateStore::connect(mongo_config).await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "couch-store")]
        StoreBackend::Couch => {
            use crate::dao::plate_store::couchdb::{CouchConfig, CouchPlateStore};

            let store = CouchPlateStore::connect(CouchConfig::from_env(config.collection())).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => Ok(Arc::new(MemoryPlateStore::new())),
        #[allow(unreachable_patterns)]
        other => Err(StorageError::unavailable(
            format!("cannot connect `{other}` store"),
            BackendDisabled(other),
        )),
    }
}

/// Connect to the storage backend and keep the shared state in degraded mode while it is
/// unavailable.
///
/// A failing health check triggers up to [`MAX_RECONNECT_ATTEMPTS`] in-place reconnects; when
/// those are exhausted the store is dropped and `connect` is called again with backoff.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn PlateStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        match connect().await {
            Ok(store) => {
                info!(
                    backend = store.backend(),
                    "storage connection established; leaving degraded mode"
                );
                state.set_plate_store(store.clone()).await;
                delay = INITIAL_DELAY;

                watch_store(&state, store.as_ref()).await;

                warn!("exhausted storage reconnect attempts; reconnecting from scratch");
                state.clear_plate_store().await;
            }
            Err(err) => warn!(error = %err, "storage connection attempt failed"),
        }

        sleep(delay).await;
        delay = (delay * 2).min(MAX_DELAY);
    }
}

/// Poll `store` until it fails and cannot be reconnected in place.
async fn watch_store(state: &SharedState, store: &dyn PlateStore) {
    let backend = store.backend();

    loop {
        match store.health_check().await {
            Ok(()) => {
                if state.is_degraded().await {
                    info!(backend, "storage healthy again; leaving degraded mode");
                    state.update_degraded(false).await;
                }
            }
            Err(err) => {
                warn!(backend, error = %err, "storage health check failed");
                if !reconnect_with_backoff(state, store).await {
                    return;
                }
                state.update_degraded(false).await;
            }
        }

        sleep(HEALTH_POLL_INTERVAL).await;
    }
}

/// Retry [`PlateStore::try_reconnect`], entering degraded mode after the first failure.
async fn reconnect_with_backoff(state: &SharedState, store: &dyn PlateStore) -> bool {
    let mut delay = INITIAL_DELAY;

    for attempt in 0..MAX_RECONNECT_ATTEMPTS {
        match store.try_reconnect().await {
            Ok(()) => {
                info!(attempt, "storage reconnection succeeded after health check failure");
                return true;
            }
            Err(err) => {
                if attempt == 0 {
                    warn!(
                        attempt, error = %err,
                        "storage reconnect first attempt failed; entering degraded mode"
                    );
                    state.update_degraded(true).await;
                } else {
                    warn!(attempt, error = %err, "storage reconnect attempt failed");
                }
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn memory_backend_always_connects() {
        let config = AppConfig::new("vehicles", StoreBackend::Memory);
        let store = connect_store(&config).await.unwrap();
        assert_eq!(store.backend(), "memory");
    }

    #[tokio::test]
    async fn supervisor_installs_store_and_leaves_degraded_mode() {
        let state = AppState::new(AppConfig::new("vehicles", StoreBackend::Memory));
        let mut watcher = state.degraded_watcher();

        let supervisor = tokio::spawn(run(state.clone(), || async {
            let store: Arc<dyn PlateStore> = Arc::new(MemoryPlateStore::new());
            Ok(store)
        }));

        tokio::time::timeout(Duration::from_secs(2), watcher.wait_for(|degraded| !degraded))
            .await
            .expect("supervisor did not install the store")
            .unwrap();
        assert!(state.plate_store().await.is_some());

        supervisor.abort();
    }
}
