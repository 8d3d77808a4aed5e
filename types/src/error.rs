//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for the civic workspace.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CivicError {
    #[error("invalid member address: {0}")]
    InvalidAddress(String),

    #[error("decimal arithmetic overflow: {0}")]
    Arithmetic(String),

    #[error("invalid decimal: {0}")]
    InvalidDecimal(String),

    #[error("invalid tally parameters: {0}")]
    InvalidParams(String),
}
