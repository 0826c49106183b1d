/// Database model definitions.
pub mod models;
/// Plate record storage backends.
pub mod plate_store;
/// Storage abstraction layer for database operations.
pub mod storage;
