//! HTTP API server for the beverage dispenser.
//!
//! Provides REST endpoints for ordering drinks, serving the queue and
//! managing the beverage catalog, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, put};
use fulfillment::DispenserService;
use metrics_exporter_prometheus::PrometheusHandle;
use store::DispenserStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: DispenserStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get::<S>))
        .with_state((state.clone(), metrics_handle));

    Router::new()
        .route("/health", get(routes::health::check::<S>))
        .route(
            "/orders",
            get(routes::orders::list::<S>).post(routes::orders::create::<S>),
        )
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route("/orders/{id}/complete", put(routes::orders::complete::<S>))
        .route(
            "/beverages",
            get(routes::beverages::list::<S>).post(routes::beverages::create::<S>),
        )
        .route(
            "/beverages/{id}",
            get(routes::beverages::get::<S>)
                .put(routes::beverages::update::<S>)
                .delete(routes::beverages::delete::<S>),
        )
        .route("/reservoir", get(routes::reservoir::get::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state around a store.
pub fn create_default_state<S: DispenserStore + 'static>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        service: DispenserService::new(store),
    })
}

/// Registers descriptions for the metrics this service emits.
pub fn describe_metrics() {
    metrics::describe_counter!("orders_admitted_total", "Orders accepted into the queue");
    metrics::describe_counter!(
        "orders_rejected_total",
        "Order requests refused, labelled by reason"
    );
    metrics::describe_counter!("orders_completed_total", "Orders served at the dispenser");
    metrics::describe_counter!(
        "orders_promoted_total",
        "Queued orders moved to the dispenser"
    );
    metrics::describe_gauge!("reservoir_remaining", "Water left in the reservoir");
    metrics::describe_histogram!(
        "order_admission_duration_seconds",
        metrics::Unit::Seconds,
        "Time spent deciding and persisting an order admission"
    );
}
