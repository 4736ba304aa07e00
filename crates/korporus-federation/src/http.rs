//! HTTP-backed manifest and remote entry sources.
//!
//! No request timeout is configured here; callers inherit the HTTP stack's
//! defaults.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::catalog::{EntrySource, RemoteEntryDocument};
use crate::discovery::ManifestSource;
use crate::error::{ManifestFetchError, RemoteLoadError, RemoteLoadResult};

fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("korporus/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Fetches manifests over HTTP.
///
/// Relative manifest URLs are resolved against the configured base URL.
#[derive(Debug, Clone)]
pub struct HttpManifestSource {
    client: reqwest::Client,
    base: Option<Url>,
}

impl HttpManifestSource {
    /// Create a source. `base` resolves relative manifest URLs.
    #[must_use]
    pub fn new(base: Option<Url>) -> Self {
        Self {
            client: build_client(),
            base,
        }
    }

    /// Use a preconfigured client.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn resolve(&self, url: &str) -> Result<Url, ManifestFetchError> {
        let transport = |message: String| ManifestFetchError::Transport {
            url: url.to_owned(),
            message,
        };
        match Url::parse(url) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .base
                .as_ref()
                .ok_or_else(|| transport("relative manifest URL and no base URL configured".into()))?
                .join(url)
                .map_err(|e| transport(e.to_string())),
            Err(e) => Err(transport(e.to_string())),
        }
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch_json(&self, url: &str) -> Result<Value, ManifestFetchError> {
        let target = self.resolve(url)?;
        debug!(url = %target, "Fetching manifest");

        let response = self.client.get(target).send().await.map_err(|e| {
            ManifestFetchError::Transport {
                url: url.to_owned(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManifestFetchError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ManifestFetchError::Body {
                url: url.to_owned(),
                message: e.to_string(),
            })
    }
}

/// Fetches remote entry documents over HTTP.
#[derive(Debug, Clone)]
pub struct HttpEntrySource {
    client: reqwest::Client,
}

impl HttpEntrySource {
    /// Create a source with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: build_client(),
        }
    }

    /// Use a preconfigured client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpEntrySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntrySource for HttpEntrySource {
    async fn fetch_entry(&self, url: &str) -> RemoteLoadResult<RemoteEntryDocument> {
        let fetch_err = |message: String| RemoteLoadError::EntryFetch {
            url: url.to_owned(),
            message,
        };
        debug!(url, "Fetching remote entry");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {}", status.as_u16())));
        }
        response
            .json::<RemoteEntryDocument>()
            .await
            .map_err(|e| fetch_err(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_manifest_urls_against_base() {
        let source = HttpManifestSource::new(Some(Url::parse("https://korpor.us/").unwrap()));
        assert_eq!(
            source.resolve("/apps/hello/manifest.json").unwrap().as_str(),
            "https://korpor.us/apps/hello/manifest.json"
        );
        assert_eq!(
            source.resolve("http://localhost:3001/manifest.json").unwrap().as_str(),
            "http://localhost:3001/manifest.json"
        );
    }

    #[test]
    fn relative_url_without_base_is_a_transport_error() {
        let source = HttpManifestSource::new(None);
        assert!(matches!(
            source.resolve("/apps/hello/manifest.json"),
            Err(ManifestFetchError::Transport { .. })
        ));
    }
}
