//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use store::DispenserStore;

use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Whether the reservoir settings record exists.
    pub reservoir: &'static str,
}

/// GET /health — reports whether the store answers and is provisioned.
pub async fn check<S: DispenserStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> (StatusCode, Json<HealthResponse>) {
    match state.service.store().load_settings().await {
        Ok(settings) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                reservoir: if settings.is_some() {
                    "configured"
                } else {
                    "missing"
                },
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "health check could not reach the store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    reservoir: "unknown",
                }),
            )
        }
    }
}
