use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nvmex_common::error::NvmexError;

/// A failed collection pass, reported to the scraper as a plain-text 500.
pub struct ScrapeError(pub NvmexError);

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        let body = format!("collection failed: {}\n", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

impl From<NvmexError> for ScrapeError {
    fn from(err: NvmexError) -> Self {
        ScrapeError(err)
    }
}
