//! Bounded fixed-backoff retry, as a plain state machine.
//!
//! The machine never sleeps itself. Callers feed it each failed attempt and
//! act on the returned [`Decision`].

use std::time::Duration;

use crate::error::HitCountError;

pub const DEFAULT_RETRIES: u32 = 5;
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

/// How many extra attempts are allowed and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failed one.
    pub retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, backoff: Duration) -> Self {
        Self { retries, backoff }
    }

    /// Fresh state for one logical operation.
    pub fn start(&self) -> RetryState {
        RetryState {
            policy: *self,
            budget: self.retries,
            attempt: 1,
        }
    }

    /// Upper bound on attempts, the first one included.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Sleep for the given duration, then attempt again.
    RetryAfter(Duration),
    /// Stop and hand the failure to the caller.
    GiveUp,
}

/// ATTEMPTING state of a single operation. Reaching DONE is expressed by
/// the caller returning, either with a value or after [`Decision::GiveUp`].
#[derive(Debug, Clone)]
pub struct RetryState {
    policy: RetryPolicy,
    budget: u32,
    attempt: u32,
}

impl RetryState {
    /// Remaining retry budget.
    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// 1-based number of the attempt currently in flight.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Record a failed attempt.
    ///
    /// Only connection-class failures consume budget; everything else gives
    /// up immediately.
    pub fn on_failure(&mut self, err: &HitCountError) -> Decision {
        if !err.is_connection() || self.budget == 0 {
            return Decision::GiveUp;
        }
        self.budget -= 1;
        self.attempt += 1;
        Decision::RetryAfter(self.policy.backoff)
    }
}
