//! Prometheus metrics endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;
use store::DispenserStore;

use super::AppState;

/// State for the scrape route: the dispenser plus the recorder handle.
pub type MetricsState<S> = (Arc<AppState<S>>, PrometheusHandle);

/// GET /metrics
///
/// The `reservoir_remaining` gauge is refreshed from the store on every
/// scrape, so it is reported even before the first order is admitted.
pub async fn get<S: DispenserStore + 'static>(
    State((state, handle)): State<MetricsState<S>>,
) -> impl IntoResponse {
    match state.service.get_reservoir().await {
        Ok(settings) => {
            metrics::gauge!("reservoir_remaining").set(settings.remaining().amount() as f64);
        }
        Err(e) => tracing::debug!(error = %e, "reservoir gauge not refreshed"),
    }

    handle.run_upkeep();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        handle.render(),
    )
}
