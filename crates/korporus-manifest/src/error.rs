//! Manifest error types.

use thiserror::Error;

/// Errors produced while turning untrusted input into an [`AppManifest`](crate::AppManifest).
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The document is not valid JSON.
    #[error("manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is JSON but fails validation. Carries every failure,
    /// not only the first one.
    #[error("Invalid app manifest:\n{}", bullet_list(.errors))]
    Invalid {
        /// One human-readable message per failed check.
        errors: Vec<String>,
    },

    /// A remote identifier contains characters a module system cannot use.
    #[error("invalid remote id '{id}': {reason}")]
    InvalidRemoteId {
        /// The rejected identifier.
        id: String,
        /// Why it was rejected.
        reason: String,
    },
}

fn bullet_list(errors: &[String]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;
