//! Parse error type.

use thiserror::Error;

/// Error produced when a CQL query string does not match the grammar.
///
/// The message is shown to callers verbatim, so it does not include the
/// position; use [`CqlParseError::position`] to point at the offending input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CqlParseError {
    /// Human-readable description, e.g. `expected index or term, got EOF`.
    pub message: String,
    /// Byte offset into the query string where the problem was detected.
    pub position: usize,
}

impl CqlParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// Byte offset of the offending token.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Result type alias for parser operations.
pub type CqlParseResult<T> = Result<T, CqlParseError>;
