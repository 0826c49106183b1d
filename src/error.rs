use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

use crate::{dao::storage::StorageError, dto::plate::OperationStatus};

/// Stable message returned to callers whenever storage fails; details only go to the logs.
pub const INFRA_ERROR_MESSAGE: &str = "storage unavailable";

/// Errors that can occur in service layer operations.
///
/// Validation failures are not errors: they are reported inside the operation result.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend failed while serving the request.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// The storage backend could not serve the request.
    #[error("infrastructure error: {0}")]
    Infra(String),
}

impl AppError {
    /// Machine-readable kind exposed in the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Infra(_) => "INFRA_ERROR",
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Infra(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: OperationStatus,
    kind: &'static str,
    message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::Infra(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let payload = Json(ErrorBody {
            status: OperationStatus::Error,
            kind: self.kind(),
            message: INFRA_ERROR_MESSAGE,
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    use super::*;

    #[tokio::test]
    async fn infra_errors_hide_backend_details() {
        let response = AppError::from(ServiceError::Degraded).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({ "status": "ERROR", "kind": "INFRA_ERROR", "message": "storage unavailable" })
        );
    }
}
