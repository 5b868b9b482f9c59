//! Shared error type across hitcount crates.

use thiserror::Error;

/// Coarse failure classes (stable API).
///
/// Retry decisions are made on the kind alone, never on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Store unreachable, refused, dropped, or timed out.
    Connection,
    /// Store answered, but with an error or an unexpected reply.
    Store,
    /// Invalid configuration.
    Config,
    /// Internal server error.
    Internal,
}

impl ErrorKind {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Connection => "CONNECTION",
            ErrorKind::Store => "STORE",
            ErrorKind::Config => "CONFIG",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, HitCountError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum HitCountError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("connection timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("store error: {0}")]
    Store(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl HitCountError {
    /// Map the error to its failure class.
    ///
    /// Socket timeouts count as connection failures.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HitCountError::Connection(_) | HitCountError::Timeout(_) => ErrorKind::Connection,
            HitCountError::Store(_) => ErrorKind::Store,
            HitCountError::Config(_) => ErrorKind::Config,
            HitCountError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn is_connection(&self) -> bool {
        self.kind() == ErrorKind::Connection
    }
}
