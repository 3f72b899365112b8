use axum::Json;
use http::StatusCode;
use jiff::Timestamp;

const SERVICE_NAME: &str = "sous-api";

/// Health check response body.
#[derive(Debug, serde::Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    service: &'static str,
    timestamp: Timestamp,
}

/// Handles health check requests.
///
/// Always healthy while the process is up; provider reachability is reported
/// by the status endpoint instead.
pub(crate) async fn health() -> (StatusCode, Json<HealthResponse>) {
    let response = HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: Timestamp::now(),
    };

    (StatusCode::OK, Json(response))
}
