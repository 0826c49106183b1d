//! Plate registration and status lookup. Each call validates the plate, then performs at most
//! one storage operation.

use tracing::{error, info};

use crate::{
    dao::models::PlateEntity,
    dto::plate::{PlateRecord, PlateRequest, PlateStatusResponse, RegisterPlateResponse},
    error::ServiceError,
    services::context::InvocationContext,
    state::SharedState,
};

/// Validate the requested plate and store a new record for it.
///
/// Plates are never deduplicated: registering the same plate twice stores two records.
pub async fn register_plate(
    state: &SharedState,
    ctx: &InvocationContext,
    request: PlateRequest,
) -> Result<RegisterPlateResponse, ServiceError> {
    let plate = match request.into_valid_plate() {
        Ok(plate) => plate,
        Err(code) => {
            error!(
                request_id = %ctx.request_id,
                code = code.code(),
                "plate registration rejected"
            );
            return Ok(RegisterPlateResponse::rejected(code));
        }
    };

    let store = state.require_plate_store().await.inspect_err(|err| {
        error!(request_id = %ctx.request_id, error = %err, "plate registration failed");
    })?;
    let doc_id = store
        .add_plate(PlateEntity::new(plate))
        .await
        .map_err(|err| {
            error!(
                request_id = %ctx.request_id,
                backend = store.backend(),
                error = %err,
                "plate registration failed"
            );
            ServiceError::from(err)
        })?;

    info!(request_id = %ctx.request_id, %doc_id, "plate registered");
    Ok(RegisterPlateResponse::registered(doc_id))
}

/// Validate the requested plate and return every record stored for it.
///
/// A plate with no record is reported as a successful lookup carrying the "NOT PAID" sentinel.
pub async fn query_plate_status(
    state: &SharedState,
    ctx: &InvocationContext,
    request: PlateRequest,
) -> Result<PlateStatusResponse, ServiceError> {
    let plate = match request.into_valid_plate() {
        Ok(plate) => plate,
        Err(code) => {
            error!(
                request_id = %ctx.request_id,
                code = code.code(),
                "plate status query rejected"
            );
            return Ok(PlateStatusResponse::rejected(code));
        }
    };

    let store = state.require_plate_store().await.inspect_err(|err| {
        error!(request_id = %ctx.request_id, error = %err, "plate status query failed");
    })?;
    let entities = store.find_by_plate(plate).await.map_err(|err| {
        error!(
            request_id = %ctx.request_id,
            backend = store.backend(),
            error = %err,
            "plate status query failed"
        );
        ServiceError::from(err)
    })?;

    info!(request_id = %ctx.request_id, matches = entities.len(), "plate status queried");
    let records = entities.into_iter().map(PlateRecord::from).collect();
    Ok(PlateStatusResponse::found(records))
}

#[cfg(test)]
mod tests {
    use std::{
        sync::Arc,
        time::{Duration, UNIX_EPOCH},
    };

    use serde_json::{Value, json};

    use super::*;
    use crate::{
        config::AppConfig,
        dao::plate_store::{PlateStore, memory::MemoryPlateStore},
        dto::plate::{DocRef, NOT_PAID, OperationStatus, PlateStatusPayload},
        state::AppState,
    };

    fn setup() -> (SharedState, MemoryPlateStore) {
        let store = MemoryPlateStore::new();
        let state = AppState::with_store(AppConfig::default(), Arc::new(store.clone()));
        (state, store)
    }

    fn request(plate: &str) -> PlateRequest {
        PlateRequest::new(plate)
    }

    #[tokio::test]
    async fn invalid_registration_never_writes() {
        let (state, store) = setup();
        let ctx = InvocationContext::new();

        for candidate in [None, Some(json!("")), Some(json!("ABC123"))] {
            let response = register_plate(&state, &ctx, PlateRequest { plate: candidate })
                .await
                .unwrap();
            assert_eq!(response.status, OperationStatus::Error);
            assert_eq!(response.payload, DocRef::none());
        }

        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn registration_messages_follow_error_code() {
        let (state, _store) = setup();
        let ctx = InvocationContext::new();

        let missing = register_plate(&state, &ctx, PlateRequest::default())
            .await
            .unwrap();
        assert_eq!(missing.message, "plate not provided");

        let invalid = register_plate(&state, &ctx, request("TOO-LONG-PLATE"))
            .await
            .unwrap();
        assert_eq!(invalid.message, "invalid plate");
    }

    #[tokio::test]
    async fn valid_registration_writes_once_and_returns_store_id() {
        let (state, store) = setup();
        let ctx = InvocationContext::new();

        let response = register_plate(&state, &ctx, request("ABC-1234"))
            .await
            .unwrap();

        assert_eq!(response.status, OperationStatus::Success);
        assert_eq!(response.message, "record inserted successfully");
        assert_eq!(store.write_count(), 1);

        let documents = store.documents().await;
        assert_eq!(documents.len(), 1);
        assert_eq!(response.payload.doc_id.as_deref(), Some(documents[0].0.as_str()));
        assert_eq!(documents[0].1.plate, "ABC-1234");
    }

    #[tokio::test]
    async fn invalid_query_never_reads() {
        let (state, store) = setup();
        let ctx = InvocationContext::new();

        let response = query_plate_status(&state, &ctx, request("ABC"))
            .await
            .unwrap();

        assert_eq!(response.status, OperationStatus::Error);
        assert_eq!(response.message, "invalid plate");
        assert_eq!(response.payload, PlateStatusPayload::Rejected(DocRef::none()));
        assert_eq!(store.read_count(), 0);
    }

    #[tokio::test]
    async fn unknown_plate_is_not_paid() {
        let (state, store) = setup();
        let ctx = InvocationContext::new();
        store.add_plate(PlateEntity::new("XYZ-9876")).await.unwrap();

        let response = query_plate_status(&state, &ctx, request("ABC-1234"))
            .await
            .unwrap();

        assert_eq!(response.status, OperationStatus::Success);
        assert_eq!(response.message, "plate queried successfully");
        assert_eq!(response.payload, PlateStatusPayload::NotPaid(NOT_PAID.into()));
        assert_eq!(store.read_count(), 1);
    }

    #[tokio::test]
    async fn non_string_plates_are_rejected_as_invalid() {
        let (state, store) = setup();
        let ctx = InvocationContext::new();

        for plate in [json!(12345678), json!(["ABC-1234"])] {
            let registration = register_plate(
                &state,
                &ctx,
                PlateRequest {
                    plate: Some(plate.clone()),
                },
            )
            .await
            .unwrap();
            assert_eq!(registration.status, OperationStatus::Error);
            assert_eq!(registration.message, "invalid plate");
            assert_eq!(registration.payload, DocRef::none());

            let query = query_plate_status(&state, &ctx, PlateRequest { plate: Some(plate) })
                .await
                .unwrap();
            assert_eq!(query.status, OperationStatus::Error);
            assert_eq!(query.message, "invalid plate");
            assert_eq!(query.payload, PlateStatusPayload::Rejected(DocRef::none()));
        }

        let missing = register_plate(&state, &ctx, PlateRequest { plate: Some(Value::Null) })
            .await
            .unwrap();
        assert_eq!(missing.message, "plate not provided");

        assert_eq!(store.write_count(), 0);
        assert_eq!(store.read_count(), 0);
    }

    #[tokio::test]
    async fn query_returns_every_matching_record() {
        let (state, store) = setup();
        let ctx = InvocationContext::new();
        let stored = [
            ("ABC-1234", 1_700_000_000),
            ("XYZ-9876", 1_700_000_100),
            ("ABC-1234", 1_700_003_600),
            ("ABC-1234", 1_700_086_400),
        ];
        for (plate, secs) in stored {
            let entity = PlateEntity {
                plate: plate.into(),
                registered_at: UNIX_EPOCH + Duration::from_secs(secs),
            };
            store.add_plate(entity).await.unwrap();
        }

        let response = query_plate_status(&state, &ctx, request("ABC-1234"))
            .await
            .unwrap();

        let PlateStatusPayload::Records(records) = response.payload else {
            panic!("expected records, got {:?}", response.payload);
        };
        let mut timestamps: Vec<_> = records
            .iter()
            .map(|record| {
                assert_eq!(record.plate, "ABC-1234");
                record.registration_timestamp.as_str()
            })
            .collect();
        timestamps.sort_unstable();
        assert_eq!(
            timestamps,
            [
                "2023-11-14T22:13:20Z",
                "2023-11-14T23:13:20Z",
                "2023-11-15T22:13:20Z",
            ]
        );
    }

    #[tokio::test]
    async fn duplicate_registrations_are_kept() {
        let (state, store) = setup();
        let ctx = InvocationContext::new();

        let first = register_plate(&state, &ctx, request("ABC-1234"))
            .await
            .unwrap();
        let second = register_plate(&state, &ctx, request("ABC-1234"))
            .await
            .unwrap();
        assert_ne!(first.payload.doc_id, second.payload.doc_id);
        assert_eq!(store.documents().await.len(), 2);

        let response = query_plate_status(&state, &ctx, request("ABC-1234"))
            .await
            .unwrap();
        match response.payload {
            PlateStatusPayload::Records(records) => assert_eq!(records.len(), 2),
            other => panic!("expected two records, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn storage_failures_surface_as_unavailable() {
        let (state, store) = setup();
        let ctx = InvocationContext::new();
        store.set_offline(true);

        let registration = register_plate(&state, &ctx, request("ABC-1234")).await;
        assert!(matches!(registration, Err(ServiceError::Unavailable(_))));

        let query = query_plate_status(&state, &ctx, request("ABC-1234")).await;
        assert!(matches!(query, Err(ServiceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn degraded_mode_rejects_valid_requests_only() {
        let state = AppState::new(AppConfig::default());
        let ctx = InvocationContext::new();

        let result = register_plate(&state, &ctx, request("ABC-1234")).await;
        assert!(matches!(result, Err(ServiceError::Degraded)));

        // Validation still answers without storage.
        let rejected = query_plate_status(&state, &ctx, request("ABC")).await.unwrap();
        assert_eq!(rejected.status, OperationStatus::Error);
    }

    #[tokio::test]
    async fn degraded_store_is_not_called() {
        let (state, store) = setup();
        let ctx = InvocationContext::new();
        state.update_degraded(true).await;

        let registration = register_plate(&state, &ctx, request("ABC-1234")).await;
        assert!(matches!(registration, Err(ServiceError::Degraded)));
        let query = query_plate_status(&state, &ctx, request("ABC-1234")).await;
        assert!(matches!(query, Err(ServiceError::Degraded)));

        assert_eq!(store.write_count(), 0);
        assert_eq!(store.read_count(), 0);
    }
}
