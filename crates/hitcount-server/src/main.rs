//! hitcount server
//!
//! - HTTP endpoint: GET / -> "Hello Anil! I've been seen {n} times."
//! - Counter lives in Redis (`INCRBY hits 1`), retried on connection failure
//! - Config: REDIS_HOST / REDIS_PORT / HITCOUNT_LISTEN, optional HITCOUNT_CONFIG yaml
//! - Graceful shutdown on SIGINT / SIGTERM, store released afterwards

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hitcount_core::error::{HitCountError, Result};
use hitcount_server::{app_state::AppState, config, router, shutdown};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::load()?;
    let listen = cfg.server.listen_addr()?;

    let state = AppState::with_redis(cfg)?;
    tracing::info!(
        key = %state.cfg().store.key,
        retries = state.cfg().retry.retries,
        backoff_ms = state.cfg().retry.backoff_ms,
        "counter configured"
    );

    // Startup probe only; the first request connects if this fails.
    if let Err(e) = state.counter().store().ping().await {
        tracing::warn!(error = %e, "redis not reachable yet");
    }

    let app = router::build_router(state.clone());

    tracing::info!(%listen, "hitcount-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| HitCountError::Internal(format!("bind {listen} failed: {e}")))?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::signal())
        .await
        .map_err(|e| HitCountError::Internal(format!("server failed: {e}")));

    state.shutdown().await;
    tracing::info!("hitcount-server stopped");
    served
}
