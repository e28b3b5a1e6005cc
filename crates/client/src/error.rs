//! Unified error type for store operations.
//!
//! The taxonomy follows how failures surface to callers:
//! - validation failures (mutating gated state without a session) fail
//!   synchronously with [`StoreError::Unauthenticated`]
//! - network/API failures propagate as [`StoreError::Gateway`] carrying the
//!   server-provided detail where available
//! - refresh-token expiry is never surfaced here; it cascades into a logout
//!   inside the store instead

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::persist::PersistError;

/// Errors returned by [`crate::Store`] actions.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A mutation that requires a logged-in session was attempted without one.
    #[error("authentication required before {0}")]
    Unauthenticated(&'static str),

    /// A remote API operation failed.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Writing or reading the persisted store record failed.
    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),

    /// The operation's result was discarded because the session changed
    /// while the request was in flight.
    #[error("operation superseded by a newer session change")]
    Superseded,
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
