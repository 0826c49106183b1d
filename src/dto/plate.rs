//! Request and response envelopes for the plate registration and status operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    dao::models::PlateEntity,
    dto::{
        format_system_time,
        validation::{PlateErrorCode, message_for, validate_plate},
    },
};

/// Message returned when a plate has been stored.
pub const REGISTERED_MESSAGE: &str = "record inserted successfully";
/// Message returned by every successful status lookup, whatever it found.
pub const QUERIED_MESSAGE: &str = "plate queried successfully";
/// Payload returned by a status lookup that matched no record.
pub const NOT_PAID: &str = "NOT PAID";

/// Body accepted by both plate operations.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PlateRequest {
    /// Plate to register or look up. Absent, null and empty values are reported as missing;
    /// any JSON value other than a string is reported as invalid.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub plate: Option<Value>,
}

impl PlateRequest {
    /// Request carrying `plate` as a JSON string.
    pub fn new(plate: impl Into<String>) -> Self {
        Self {
            plate: Some(Value::String(plate.into())),
        }
    }

    /// Run the plate through [`validate_plate`], returning it when it passed.
    pub fn into_valid_plate(self) -> Result<String, PlateErrorCode> {
        match self.plate {
            None | Some(Value::Null) => Err(PlateErrorCode::Missing),
            Some(Value::String(plate)) => {
                let code = validate_plate(Some(&plate));
                if code.is_ok() { Ok(plate) } else { Err(code) }
            }
            Some(_) => Err(PlateErrorCode::Invalid),
        }
    }
}

/// Outcome flag shared by every operation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    /// The operation completed.
    Success,
    /// Validation or storage failed.
    Error,
}

/// Reference to a stored document; `docId` is null when nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DocRef {
    /// Identifier generated by the store.
    #[serde(rename = "docId")]
    pub doc_id: Option<String>,
}

impl DocRef {
    /// Reference for a call that stored nothing.
    pub fn none() -> Self {
        Self { doc_id: None }
    }
}

/// Result of a registration call.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterPlateResponse {
    /// Outcome flag.
    pub status: OperationStatus,
    /// Human-readable outcome.
    pub message: String,
    /// Identifier of the stored record, null when validation failed.
    pub payload: DocRef,
}

impl RegisterPlateResponse {
    /// Plate stored under `doc_id`.
    pub fn registered(doc_id: String) -> Self {
        Self {
            status: OperationStatus::Success,
            message: REGISTERED_MESSAGE.into(),
            payload: DocRef {
                doc_id: Some(doc_id),
            },
        }
    }

    /// Plate failed validation with `code`; nothing was written.
    pub fn rejected(code: PlateErrorCode) -> Self {
        Self {
            status: OperationStatus::Error,
            message: message_for(code).into(),
            payload: DocRef::none(),
        }
    }
}

/// Stored plate as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlateRecord {
    /// Plate as it was registered.
    pub plate: String,
    /// RFC 3339 timestamp set by the server when the plate was registered.
    pub registration_timestamp: String,
}

impl From<PlateEntity> for PlateRecord {
    fn from(value: PlateEntity) -> Self {
        Self {
            plate: value.plate,
            registration_timestamp: format_system_time(value.registered_at),
        }
    }
}

/// Payload of a status lookup.
///
/// The variants serialize to three different JSON shapes: `{"docId": null}`, the `"NOT PAID"`
/// string, or an array of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum PlateStatusPayload {
    /// Validation failed and no lookup was made.
    Rejected(DocRef),
    /// No record exists for the plate. Record absence is reported as "not paid".
    NotPaid(String),
    /// Every record registered for the plate, unordered.
    Records(Vec<PlateRecord>),
}

/// Result of a status lookup.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlateStatusResponse {
    /// Outcome flag.
    pub status: OperationStatus,
    /// Human-readable outcome.
    pub message: String,
    /// Matching records, the not-paid sentinel, or a null document reference.
    pub payload: PlateStatusPayload,
}

impl PlateStatusResponse {
    /// Successful lookup; an empty match list becomes the [`NOT_PAID`] sentinel.
    pub fn found(records: Vec<PlateRecord>) -> Self {
        let payload = if records.is_empty() {
            PlateStatusPayload::NotPaid(NOT_PAID.into())
        } else {
            PlateStatusPayload::Records(records)
        };

        Self {
            status: OperationStatus::Success,
            message: QUERIED_MESSAGE.into(),
            payload,
        }
    }

    /// Plate failed validation with `code`; no lookup was made.
    pub fn rejected(code: PlateErrorCode) -> Self {
        Self {
            status: OperationStatus::Error,
            message: message_for(code).into(),
            payload: PlateStatusPayload::Rejected(DocRef::none()),
        }
    }
}
