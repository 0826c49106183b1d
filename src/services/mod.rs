/// Per-call invocation context.
pub mod context;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Plate registration and status lookup.
pub mod plate_service;
/// Storage connection supervisor toggling degraded mode.
pub mod storage_supervisor;
