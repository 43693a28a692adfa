//! # Error Types
//!
//! Construction failures for the validated newtypes in this crate.

use thiserror::Error;

/// Error raised when a foundational value fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A scheme identifier had the wrong shape.
    #[error("invalid {kind} identifier {value:?}: {reason}")]
    InvalidIdentifier {
        /// Which identifier namespace was being parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A timestamp could not be parsed or was out of range.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A big number was not a non-negative decimal integer.
    #[error("invalid number {0:?}: expected decimal digits")]
    InvalidNumber(String),
}
