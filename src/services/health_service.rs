use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether a plate store is installed and answering, logging connectivity issues.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let collection = state.config().collection();
    let store = match state.require_plate_store().await {
        Ok(store) => store,
        Err(err) => {
            warn!(collection, error = %err, "storage unavailable");
            return HealthResponse::degraded();
        }
    };

    match store.health_check().await {
        Ok(()) => HealthResponse::ok(store.backend()),
        Err(err) => {
            warn!(
                backend = store.backend(),
                collection,
                error = %err,
                "storage health check failed"
            );
            HealthResponse::degraded()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::AppConfig, dao::plate_store::memory::MemoryPlateStore, state::AppState};

    #[tokio::test]
    async fn degraded_without_store() {
        let state = AppState::new(AppConfig::default());
        assert_eq!(health_status(&state).await.status, "degraded");
    }

    #[tokio::test]
    async fn reflects_store_health() {
        let store = MemoryPlateStore::new();
        let state = AppState::with_store(AppConfig::default(), Arc::new(store.clone()));

        let healthy = health_status(&state).await;
        assert_eq!(healthy.status, "ok");
        assert_eq!(healthy.store.as_deref(), Some("memory"));

        store.set_offline(true);
        assert_eq!(health_status(&state).await.status, "degraded");
    }

    #[tokio::test]
    async fn degraded_flag_wins_over_installed_store() {
        let state = AppState::with_store(AppConfig::default(), Arc::new(MemoryPlateStore::new()));
        state.update_degraded(true).await;

        let response = health_status(&state).await;
        assert_eq!(response.status, "degraded");
        assert!(response.store.is_none());
    }
}
