use mongodb::bson::{Bson, DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::dao::models::PlateEntity;

/// Field holding the plate identifier; equality lookups and the index use it.
pub const PLATE_FIELD: &str = "plate";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPlateDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    plate: String,
    registered_at: DateTime,
}

impl From<PlateEntity> for MongoPlateDocument {
    fn from(value: PlateEntity) -> Self {
        Self {
            id: None,
            plate: value.plate,
            registered_at: DateTime::from_system_time(value.registered_at),
        }
    }
}

impl From<MongoPlateDocument> for PlateEntity {
    fn from(value: MongoPlateDocument) -> Self {
        Self {
            plate: value.plate,
            registered_at: value.registered_at.to_system_time(),
        }
    }
}

/// Render the `_id` assigned by the server as an opaque string.
pub fn inserted_id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(value) => value.clone(),
        other => other.to_string(),
    }
}
