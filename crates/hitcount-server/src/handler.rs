use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use hitcount_core::greeting;

use crate::app_state::AppState;
use crate::error::ApiError;

/// `GET /`: bump the counter and greet.
#[tracing::instrument(name = "hello", skip_all)]
pub async fn hello(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let hits = state.counter().increment().await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        greeting::render(hits),
    ))
}
