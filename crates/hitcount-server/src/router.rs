//! Axum router wiring.
//!
//! Exposes the single counter route at `/`.

use axum::{routing::get, Router};

use crate::{app_state::AppState, handler};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::hello))
        .with_state(state)
}
