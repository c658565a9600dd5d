//! HTTP API server for the kitchen flow system.
//!
//! Maps transport requests onto the kitchen service operations and maps
//! operation errors back to HTTP statuses, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use store::{DeliveryStore, InMemoryDeliveryStore, InMemoryPreparationStore, PreparationStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<P, D>(state: Arc<AppState<P, D>>, metrics_handle: PrometheusHandle) -> Router
where
    P: PreparationStore + 'static,
    D: DeliveryStore + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/preparations", post(routes::preparations::create::<P, D>))
        .route("/preparations", get(routes::preparations::list::<P, D>))
        .route(
            "/preparations/start",
            post(routes::preparations::start::<P, D>),
        )
        .route(
            "/preparations/{id}",
            get(routes::preparations::get::<P, D>),
        )
        .route(
            "/preparations/{id}/finish",
            post(routes::preparations::finish::<P, D>),
        )
        .route("/deliveries", post(routes::deliveries::create::<P, D>))
        .route(
            "/deliveries/ready",
            get(routes::deliveries::list_ready::<P, D>),
        )
        .route("/deliveries/{id}", get(routes::deliveries::get::<P, D>))
        .route(
            "/deliveries/{id}/finalize",
            post(routes::deliveries::finalize::<P, D>),
        )
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

/// Creates application state backed by the in-memory stores.
pub fn create_default_state() -> Arc<AppState<InMemoryPreparationStore, InMemoryDeliveryStore>> {
    let service = app::KitchenService::new(
        InMemoryPreparationStore::new(),
        InMemoryDeliveryStore::new(),
    );
    Arc::new(AppState { service })
}
