//! Concurrent manifest discovery.

use async_trait::async_trait;
use futures::future::join_all;
use korporus_manifest::{AppManifest, parse_manifest};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{DiscoveryError, ManifestFetchError};

/// Where manifest documents come from.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Fetch the JSON document at `url`.
    async fn fetch_json(&self, url: &str) -> Result<Value, ManifestFetchError>;
}

/// Fetch and validate one manifest.
///
/// # Errors
///
/// Returns [`DiscoveryError::Fetch`] if the document cannot be retrieved and
/// [`DiscoveryError::Validation`] if it is not a valid manifest.
pub async fn fetch_manifest<S>(source: &S, url: &str) -> Result<AppManifest, DiscoveryError>
where
    S: ManifestSource + ?Sized,
{
    let raw = source.fetch_json(url).await?;
    parse_manifest(&raw).map_err(|source| DiscoveryError::Validation {
        url: url.to_owned(),
        source,
    })
}

/// Fetch every URL concurrently and return the manifests that validate.
///
/// Each URL is independent: a failed fetch or invalid document is logged
/// and skipped without affecting the others. Results keep the order of
/// `urls`.
pub async fn load_manifests<S>(source: &S, urls: &[String]) -> Vec<AppManifest>
where
    S: ManifestSource + ?Sized,
{
    let results = join_all(urls.iter().map(|url| fetch_manifest(source, url))).await;

    let mut manifests = Vec::with_capacity(urls.len());
    for (url, result) in urls.iter().zip(results) {
        match result {
            Ok(manifest) => {
                debug!(url = %url, app_id = %manifest.id, "Loaded app manifest");
                manifests.push(manifest);
            },
            Err(e) => {
                warn!(url = %url, error = %e, "Skipping app manifest");
            },
        }
    }

    info!(
        requested = urls.len(),
        loaded = manifests.len(),
        "Discovered app manifests"
    );
    manifests
}
