//! Library crate for plate-registry, exposing modules for binaries and tests.

/// Application configuration loading.
pub mod config;
/// Storage layer: entities, the plate store abstraction and its backends.
pub mod dao;
/// Request and response types exchanged over HTTP.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// Axum routers.
pub mod routes;
/// Business logic behind the routes.
pub mod services;
/// Shared application state.
pub mod state;
