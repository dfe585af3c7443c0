//! Liveness probe.

use axum::Json;
use chrono::Utc;
use verto_core::api::HealthResponse;

/// Returns 200 while the process is serving. Does not touch the catalog.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is running!".to_string(),
        timestamp: Utc::now(),
    })
}
