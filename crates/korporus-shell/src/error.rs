//! Shell error types.

use thiserror::Error;

/// Errors surfaced by the host shell.
#[derive(Debug, Error)]
pub enum ShellError {
    /// `shell.base_url` is not a usable origin.
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        /// Configured value.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },

    /// No discovered manifest has this id.
    #[error("app '{app_id}' not found; discovered apps: {known}")]
    UnknownApp {
        /// Requested id.
        app_id: String,
        /// Comma-separated ids that are known.
        known: String,
    },
}

/// Result type for shell operations.
pub type ShellResult<T> = Result<T, ShellError>;
