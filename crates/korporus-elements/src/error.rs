//! Element bridge error types.

use thiserror::Error;

/// Errors from element registration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ElementError {
    /// The tag name does not satisfy the custom element naming rules.
    #[error("invalid custom element tag '{tag}': {reason}")]
    InvalidTagName {
        /// The rejected tag.
        tag: String,
        /// Which rule it violates.
        reason: String,
    },
}

/// Result type for element operations.
pub type ElementResult<T> = Result<T, ElementError>;
