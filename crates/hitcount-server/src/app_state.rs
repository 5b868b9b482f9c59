//! Shared application state.
//!
//! The store handle is built once by the caller and injected here; the state
//! never reaches for a process-global client.

use std::sync::Arc;

use hitcount_core::error::Result;

use crate::config::ServerConfig;
use crate::counter::CounterClient;
use crate::store::{CounterStore, RedisStore};

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<ServerConfig>,
    counter: CounterClient,
}

impl AppState {
    /// Wire state around an already constructed store.
    pub fn new(cfg: ServerConfig, store: Arc<dyn CounterStore>) -> Self {
        let counter = CounterClient::new(store, cfg.store.key.clone(), cfg.retry.policy());
        Self {
            cfg: Arc::new(cfg),
            counter,
        }
    }

    /// Build state backed by Redis, as configured.
    pub fn with_redis(cfg: ServerConfig) -> Result<Self> {
        let store = RedisStore::new(&cfg.store)?;
        tracing::info!(endpoint = %store.endpoint(), db = cfg.store.db, "redis store configured");
        Ok(Self::new(cfg, Arc::new(store)))
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.cfg
    }

    pub fn counter(&self) -> &CounterClient {
        &self.counter
    }

    /// Release the store connection. Called once after the server stops.
    pub async fn shutdown(&self) {
        self.counter.store().close().await;
    }
}
