//! External counter store seam.
//!
//! The store owns the Hit Counter. This process only ever asks it for an
//! atomic increment and never reads or resets the value directly.

pub mod redis;

use async_trait::async_trait;

use hitcount_core::error::Result;

pub use self::redis::RedisStore;

/// Atomic-increment store. One attempt per call; retrying is the caller's job.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment `key` by 1 and return the post-increment value.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Round-trip liveness probe.
    async fn ping(&self) -> Result<()>;

    /// Release the held connection. Later calls may reconnect.
    async fn close(&self);
}
