//! CLI command implementations.

pub mod auth;
pub mod cart;

use thiserror::Error;

/// Errors raised by CLI commands on top of store failures.
#[derive(Debug, Error)]
pub enum CliError {
    /// Store or gateway operation failed.
    #[error(transparent)]
    Store(#[from] electrostore_client::StoreError),

    /// A price argument was not a valid decimal.
    #[error("invalid price '{0}': {1}")]
    InvalidPrice(String, rust_decimal::Error),
}
