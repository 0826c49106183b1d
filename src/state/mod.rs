use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{config::AppConfig, dao::plate_store::PlateStore, error::ServiceError};

/// Shared handle to the application state, cloned into every handler.
pub type SharedState = Arc<AppState>;

/// Central application state holding the configuration and the storage handle.
///
/// No plate data is cached here; every request goes to the installed store.
pub struct AppState {
    config: AppConfig,
    plate_store: RwLock<Option<Arc<dyn PlateStore>>>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            plate_store: RwLock::new(None),
            degraded: degraded_tx,
        })
    }

    /// Construct a state with `store` already installed.
    pub fn with_store(config: AppConfig, store: Arc<dyn PlateStore>) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(false);
        Arc::new(Self {
            config,
            plate_store: RwLock::new(Some(store)),
            degraded: degraded_tx,
        })
    }

    /// Configuration the process was started with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current plate store, if one is installed.
    pub async fn plate_store(&self) -> Option<Arc<dyn PlateStore>> {
        let guard = self.plate_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current plate store or fail with [`ServiceError::Degraded`].
    ///
    /// A store that is still installed while the supervisor retries it counts as unavailable.
    pub async fn require_plate_store(&self) -> Result<Arc<dyn PlateStore>, ServiceError> {
        if self.is_degraded().await {
            return Err(ServiceError::Degraded);
        }
        self.plate_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new plate store implementation and leave degraded mode.
    pub async fn set_plate_store(&self, store: Arc<dyn PlateStore>) {
        {
            let mut guard = self.plate_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current plate store and enter degraded mode.
    pub async fn clear_plate_store(&self) {
        {
            let mut guard = self.plate_store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::plate_store::memory::MemoryPlateStore;

    #[tokio::test]
    async fn starts_degraded_until_store_installed() {
        let state = AppState::new(AppConfig::default());
        assert!(state.is_degraded().await);
        assert!(matches!(
            state.require_plate_store().await,
            Err(ServiceError::Degraded)
        ));

        let mut watcher = state.degraded_watcher();
        state.set_plate_store(Arc::new(MemoryPlateStore::new())).await;
        assert!(!state.is_degraded().await);
        assert!(watcher.has_changed().unwrap());
        assert!(!*watcher.borrow_and_update());

        state.clear_plate_store().await;
        assert!(state.is_degraded().await);
        assert!(state.plate_store().await.is_none());
    }

    #[tokio::test]
    async fn degraded_flag_hides_installed_store() {
        let state = AppState::with_store(AppConfig::default(), Arc::new(MemoryPlateStore::new()));
        assert!(state.require_plate_store().await.is_ok());

        state.update_degraded(true).await;
        assert!(state.plate_store().await.is_some());
        assert!(matches!(
            state.require_plate_store().await,
            Err(ServiceError::Degraded)
        ));

        state.update_degraded(false).await;
        assert!(state.require_plate_store().await.is_ok());
    }
}
