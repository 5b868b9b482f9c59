//! Retrying counter client.
//!
//! Drives the core retry machine with tokio timers around a single
//! [`CounterStore::incr`] call per attempt.

use std::sync::Arc;

use hitcount_core::error::Result;
use hitcount_core::retry::{Decision, RetryPolicy};

use crate::store::CounterStore;

#[derive(Clone)]
pub struct CounterClient {
    store: Arc<dyn CounterStore>,
    key: String,
    policy: RetryPolicy,
}

impl CounterClient {
    pub fn new(store: Arc<dyn CounterStore>, key: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            store,
            key: key.into(),
            policy,
        }
    }

    pub fn store(&self) -> Arc<dyn CounterStore> {
        Arc::clone(&self.store)
    }

    /// Atomically bump the Hit Counter and return its new value.
    ///
    /// Connection failures are retried per policy with a fixed sleep in
    /// between; any other failure is returned after the first attempt.
    pub async fn increment(&self) -> Result<i64> {
        let mut state = self.policy.start();
        loop {
            let err = match self.store.incr(&self.key).await {
                Ok(n) => {
                    tracing::debug!(key = %self.key, attempt = state.attempt(), count = n, "incremented");
                    return Ok(n);
                }
                Err(e) => e,
            };

            match state.on_failure(&err) {
                Decision::RetryAfter(backoff) => {
                    tracing::warn!(
                        key = %self.key,
                        error = %err,
                        retries_left = state.budget(),
                        next_attempt = state.attempt(),
                        "store unavailable, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Decision::GiveUp => {
                    tracing::error!(
                        key = %self.key,
                        kind = err.kind().as_str(),
                        attempts = state.attempt(),
                        max_attempts = self.policy.max_attempts(),
                        error = %err,
                        "increment failed"
                    );
                    return Err(err);
                }
            }
        }
    }
}
