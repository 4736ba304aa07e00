//! Federation error types.
//!
//! Discovery errors ([`ManifestFetchError`], [`DiscoveryError`]) are logged
//! and swallowed at the discovery boundary. [`RemoteLoadError`] propagates to
//! whoever asked for the remote; retrying is their decision.

use korporus_manifest::{ManifestError, RemoteId};
use thiserror::Error;

/// Failure retrieving a manifest document.
#[derive(Debug, Error)]
pub enum ManifestFetchError {
    /// The server answered with a non-success status.
    #[error("failed to fetch manifest at {url}: HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request could not be completed.
    #[error("error fetching manifest at {url}: {message}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },

    /// The response body is not JSON.
    #[error("manifest at {url} is not valid JSON: {message}")]
    Body {
        /// Requested URL.
        url: String,
        /// Decode error description.
        message: String,
    },
}

/// Why a single manifest was dropped during discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The document could not be retrieved.
    #[error(transparent)]
    Fetch(#[from] ManifestFetchError),

    /// The document was retrieved but is not a valid manifest.
    #[error("invalid manifest at {url}: {source}")]
    Validation {
        /// Manifest URL.
        url: String,
        /// Aggregated validation failure.
        #[source]
        source: ManifestError,
    },
}

/// Failure registering or importing a remote.
///
/// Cloneable so that every caller joined on one in-flight load receives the
/// same error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteLoadError {
    /// The remote entry cannot be turned into an absolute URL.
    #[error("cannot resolve remote entry '{entry}': {message}")]
    InvalidEntry {
        /// The entry as written in the manifest.
        entry: String,
        /// Resolution failure.
        message: String,
    },

    /// One-time runtime initialization failed.
    #[error("federation runtime failed to initialize: {0}")]
    Init(String),

    /// The runtime refused the remote registration.
    #[error("failed to register remote {remote_id}: {message}")]
    Registration {
        /// Remote being registered.
        remote_id: RemoteId,
        /// Refusal reason.
        message: String,
    },

    /// The module request names a remote the runtime does not know.
    #[error("remote '{remote}' is not registered")]
    UnknownRemote {
        /// Remote name from the module request.
        remote: String,
    },

    /// The remote entry artifact could not be retrieved or decoded.
    #[error("failed to fetch remote entry {url}: {message}")]
    EntryFetch {
        /// Absolute entry URL.
        url: String,
        /// Failure description.
        message: String,
    },

    /// The remote entry does not list the requested module.
    #[error("module {request} is not exposed by its remote")]
    NotExposed {
        /// Full module request, e.g. `hello_app/bootstrap`.
        request: String,
    },

    /// The remote exposes the module but this host has no implementation
    /// linked for it.
    #[error("module {request} is not linked into this host")]
    NotLinked {
        /// Full module request.
        request: String,
    },

    /// The bootstrap module ran but failed to register its elements.
    #[error("bootstrap of {remote_id} failed: {message}")]
    Bootstrap {
        /// Remote whose bootstrap failed.
        remote_id: RemoteId,
        /// Failure description.
        message: String,
    },
}

/// Result type for remote loading.
pub type RemoteLoadResult<T> = Result<T, RemoteLoadError>;
