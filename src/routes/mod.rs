use axum::Router;

use crate::state::SharedState;

/// Swagger UI and OpenAPI JSON routes.
pub mod docs;
/// Health check route.
pub mod health;
/// Plate registration and status routes.
pub mod plates;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router().merge(plates::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
