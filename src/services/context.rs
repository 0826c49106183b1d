use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Header a caller may set to correlate its own logs with ours.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Metadata attached to a single call of a plate operation.
///
/// It is only used to correlate log events; business logic never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationContext {
    /// Identifier attached to every log event of the call.
    pub request_id: Uuid,
}

impl InvocationContext {
    /// Context with a freshly generated request id.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
        }
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> FromRequestParts<S> for InvocationContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Malformed caller ids are replaced rather than rejected.
        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self { request_id })
    }
}
