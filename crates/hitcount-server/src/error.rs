//! HTTP mapping for core errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use hitcount_core::error::HitCountError;

/// Handler error. Always renders as a generic 500; details go to the log only.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub HitCountError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.0.kind().as_str(), error = %self.0, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
