//! Event shape errors

use thiserror::Error;

/// Raised when an event does not have the shape an extractor expects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// Expected a bare token
    #[error("expected string argument, got {0}")]
    ExpectedAtom(String),

    /// Expected a list
    #[error("expected list, got {0}")]
    ExpectedList(String),

    /// List had the wrong number of elements
    #[error("expected list of length {expected}, got length {actual} ({event})")]
    Length {
        /// Accepted length, `n` or `n-m`
        expected: String,
        /// Actual length
        actual: usize,
        /// Rendered event
        event: String,
    },
}
