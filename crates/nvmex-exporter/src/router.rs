use std::sync::Arc;

use axum::{Router, routing::get};
use nvmex_collector::Collector;
use tower_http::trace::TraceLayer;

use crate::handlers;

pub struct ExporterState {
    pub collector: Collector,
}

impl ExporterState {
    pub fn new(collector: Collector) -> Self {
        Self { collector }
    }
}

pub fn exporter_router(state: Arc<ExporterState>) -> Router {
    Router::new()
        .route("/metrics", get(handlers::metrics::prometheus_metrics))
        .route("/health/live", get(handlers::health::health_live))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
