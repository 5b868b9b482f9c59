//! hitcount server library entry.
//!
//! Wires configuration, the Redis counter store, the retrying counter client,
//! and the HTTP route into one service. Consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod app_state;
pub mod config;
pub mod counter;
pub mod error;
pub mod handler;
pub mod router;
pub mod shutdown;
pub mod store;

