use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the plate registry.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::plates::register_plate,
        crate::routes::plates::query_plate_status,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::plate::PlateRequest,
            crate::dto::plate::OperationStatus,
            crate::dto::plate::DocRef,
            crate::dto::plate::PlateRecord,
            crate::dto::plate::PlateStatusPayload,
            crate::dto::plate::RegisterPlateResponse,
            crate::dto::plate::PlateStatusResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "plates", description = "Plate registration and payment status"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_plate_operations() {
        let doc = ApiDoc::openapi();
        for path in ["/plates/register", "/plates/status", "/healthcheck"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
