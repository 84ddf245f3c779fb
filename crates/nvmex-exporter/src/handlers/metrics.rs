use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::Response,
};
use nvmex_metrics::render_prometheus;
use tracing::error;

use crate::{error::ScrapeError, router::ExporterState};

pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Runs a fresh collection pass for every scrape.
pub async fn prometheus_metrics(
    State(state): State<Arc<ExporterState>>,
) -> Result<Response, ScrapeError> {
    let report = state.collector.collect().await.map_err(|err| {
        error!(class = err.class(), error = %err, "nvme collection failed");
        ScrapeError(err)
    })?;
    let payload = render_prometheus(report.metrics.families());

    let mut response = Response::new(Body::from(payload));
    *response.status_mut() = StatusCode::OK;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(PROMETHEUS_CONTENT_TYPE),
    );

    Ok(response)
}
