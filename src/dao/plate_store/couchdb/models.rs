use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::dao::models::PlateEntity;

/// Number of documents requested per `_find` round trip.
pub const FIND_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchPlateDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    pub plate: String,
    pub registered_at: SystemTime,
}

impl CouchPlateDocument {
    pub fn from_entity(entity: PlateEntity) -> Self {
        Self {
            id: None,
            rev: None,
            plate: entity.plate,
            registered_at: entity.registered_at,
        }
    }

    pub fn into_entity(self) -> PlateEntity {
        PlateEntity {
            plate: self.plate,
            registered_at: self.registered_at,
        }
    }
}

/// Body returned by `POST /{db}` once a document has been created.
#[derive(Debug, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Mango query body for `POST /{db}/_find`.
#[derive(Debug, Serialize)]
pub struct FindRequest<'a> {
    pub selector: PlateSelector<'a>,
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct PlateSelector<'a> {
    pub plate: &'a str,
}

impl<'a> FindRequest<'a> {
    pub fn for_plate(plate: &'a str, bookmark: Option<&'a str>) -> Self {
        Self {
            selector: PlateSelector { plate },
            limit: FIND_PAGE_SIZE,
            bookmark,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FindResponse {
    pub docs: Vec<CouchPlateDocument>,
    #[serde(default)]
    pub bookmark: Option<String>,
}

/// Body for `POST /{db}/_index` declaring the lookup index on `plate`.
#[derive(Debug, Serialize)]
pub struct IndexRequest {
    pub index: IndexFields,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IndexFields {
    pub fields: [&'static str; 1],
}

impl IndexRequest {
    pub fn plate_index() -> Self {
        Self {
            index: IndexFields { fields: ["plate"] },
            name: "plate-idx",
            kind: "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn find_request_selects_by_plate_equality() {
        let body = serde_json::to_value(FindRequest::for_plate("ABC-1234", None)).unwrap();
        assert_eq!(
            body,
            json!({ "selector": { "plate": "ABC-1234" }, "limit": FIND_PAGE_SIZE })
        );

        let next = serde_json::to_value(FindRequest::for_plate("ABC-1234", Some("g1AAAA"))).unwrap();
        assert_eq!(next["bookmark"], "g1AAAA");
    }

    #[test]
    fn new_documents_omit_couch_metadata() {
        let doc = CouchPlateDocument::from_entity(PlateEntity::new("ABC-1234"));
        let body = serde_json::to_value(&doc).unwrap();
        assert!(body.get("_id").is_none());
        assert!(body.get("_rev").is_none());
        assert_eq!(body["plate"], "ABC-1234");
    }

    #[test]
    fn found_documents_tolerate_metadata() {
        let payload = json!({
            "docs": [{
                "_id": "4f1c",
                "_rev": "1-abc",
                "plate": "ABC-1234",
                "registered_at": { "secs_since_epoch": 1_700_000_000u64, "nanos_since_epoch": 0 }
            }],
            "bookmark": "nil"
        });
        let parsed: FindResponse = serde_json::from_value(payload).unwrap();
        assert_eq!(parsed.docs.len(), 1);
        assert_eq!(parsed.docs[0].clone().into_entity().plate, "ABC-1234");
    }
}
