use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::plate::{PlateRequest, PlateStatusResponse, RegisterPlateResponse},
    error::AppError,
    services::{context::InvocationContext, plate_service},
    state::SharedState,
};

/// Remote-callable plate operations.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/plates/register", post(register_plate))
        .route("/plates/status", post(query_plate_status))
}

#[utoipa::path(
    post,
    path = "/plates/register",
    tag = "plates",
    request_body = PlateRequest,
    params(("X-Request-Id" = Option<String>, Header, description = "Optional UUID used to correlate logs")),
    responses(
        (status = 200, description = "Registration result; validation failures carry status ERROR", body = RegisterPlateResponse),
        (status = 503, description = "Storage unavailable (INFRA_ERROR)")
    )
)]
/// Register a new record for a plate.
pub async fn register_plate(
    State(state): State<SharedState>,
    ctx: InvocationContext,
    Json(request): Json<PlateRequest>,
) -> Result<Json<RegisterPlateResponse>, AppError> {
    let payload = plate_service::register_plate(&state, &ctx, request).await?;
    Ok(Json(payload))
}

#[utoipa::path(
    post,
    path = "/plates/status",
    tag = "plates",
    request_body = PlateRequest,
    params(("X-Request-Id" = Option<String>, Header, description = "Optional UUID used to correlate logs")),
    responses(
        (status = 200, description = "Records for the plate, or \"NOT PAID\" when none exist", body = PlateStatusResponse),
        (status = 503, description = "Storage unavailable (INFRA_ERROR)")
    )
)]
/// Return the payment status of a plate.
pub async fn query_plate_status(
    State(state): State<SharedState>,
    ctx: InvocationContext,
    Json(request): Json<PlateRequest>,
) -> Result<Json<PlateStatusResponse>, AppError> {
    let payload = plate_service::query_plate_status(&state, &ctx, request).await?;
    Ok(Json(payload))
}
