use serde::Serialize;
use utoipa::ToSchema;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Storage backend currently installed, absent while degraded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
}

impl HealthResponse {
    /// The plate store is installed and answered its health check.
    pub fn ok(store: &str) -> Self {
        Self {
            status: "ok".to_string(),
            store: Some(store.to_string()),
        }
    }

    /// No plate store is installed, or the installed one is failing.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            store: None,
        }
    }
}
