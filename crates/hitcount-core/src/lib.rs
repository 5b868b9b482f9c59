//! hitcount core: transport-agnostic error taxonomy, retry state machine, and
//! response rendering.
//!
//! This crate carries no runtime or network dependencies. The server crate
//! drives the retry machine with tokio timers and a real store client.
//!
//! # Guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `HitCountError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod greeting;
pub mod retry;

pub use error::{ErrorKind, HitCountError, Result};
pub use retry::{Decision, RetryPolicy, RetryState};
