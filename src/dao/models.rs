use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// A registered vehicle plate as persisted by every storage backend.
///
/// Records are write-once: nothing in the application updates or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlateEntity {
    /// Plate identifier exactly as submitted by the caller.
    pub plate: String,
    /// Time the record was created on the server.
    pub registered_at: SystemTime,
}

impl PlateEntity {
    /// Build a fresh record for `plate`, stamped with the current time.
    pub fn new(plate: impl Into<String>) -> Self {
        Self {
            plate: plate.into(),
            registered_at: SystemTime::now(),
        }
    }
}
