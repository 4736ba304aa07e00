//! The host: discovery, loading and app sessions wired from configuration.

use std::sync::Arc;

use korporus_config::Config;
use korporus_elements::ElementRegistry;
use korporus_federation::{
    CatalogRuntime, FederationContext, FederationRuntime, HostRegistry, HttpEntrySource,
    HttpManifestSource, ManifestSource, RemoteLoader,
};
use tracing::debug;
use url::Url;

use crate::error::{ShellError, ShellResult};
use crate::hello::HelloRemote;
use crate::session::AppSession;

/// A configured shell host.
pub struct Host {
    config: Config,
    manifests: Arc<dyn ManifestSource>,
    registry: HostRegistry,
    loader: RemoteLoader,
}

impl Host {
    /// Assemble a host from explicit seams.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::InvalidBaseUrl`] if `shell.base_url` does not
    /// parse.
    pub fn new(
        config: Config,
        manifests: Arc<dyn ManifestSource>,
        runtime: Arc<dyn FederationRuntime>,
    ) -> ShellResult<Self> {
        let origin = parse_origin(&config)?;
        let context = Arc::new(FederationContext::new(config.shell.name.clone()));
        let loader = RemoteLoader::new(runtime, Arc::new(ElementRegistry::new()), context, origin);
        Ok(Self {
            config,
            manifests,
            registry: HostRegistry::new(),
            loader,
        })
    }

    /// A host fetching manifests and remote entries over HTTP, with the
    /// hello remote linked in.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::InvalidBaseUrl`] if `shell.base_url` does not
    /// parse.
    pub fn over_http(config: Config) -> ShellResult<Self> {
        let origin = parse_origin(&config)?;
        let manifests = Arc::new(HttpManifestSource::new(Some(origin)));
        let runtime = CatalogRuntime::new(Arc::new(HttpEntrySource::new()))
            .with_module(HelloRemote::request(), Arc::new(HelloRemote::new()));
        Self::new(config, manifests, Arc::new(runtime))
    }

    /// Discover the configured manifests. Returns how many are valid.
    pub async fn discover(&self) -> usize {
        self.registry
            .refresh(self.manifests.as_ref(), &self.config.manifests.urls)
            .await
    }

    /// Create a session for `app_id` without loading it.
    ///
    /// In dev mode, apps with a dev server port load from that server.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::UnknownApp`] if no discovered manifest has the
    /// id.
    pub fn open(&self, app_id: &str) -> ShellResult<AppSession> {
        let manifest = self
            .registry
            .find(app_id)
            .ok_or_else(|| ShellError::UnknownApp {
                app_id: app_id.to_owned(),
                known: self
                    .registry
                    .apps()
                    .iter()
                    .map(|app| app.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;

        let dev_entry = self
            .config
            .shell
            .dev_mode
            .then(|| self.config.ports.dev_remote_entry(&manifest.id))
            .flatten();
        let session = AppSession::new(manifest, self.loader.elements());
        Ok(match dev_entry {
            Some(entry) => {
                debug!(app_id, entry = %entry, "Using dev server entry");
                session.with_entry(entry)
            },
            None => session,
        })
    }

    /// Open `app_id` and load it.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::UnknownApp`] for unknown ids. Load failures are
    /// reported through the session's state instead.
    pub async fn mount(&self, app_id: &str) -> ShellResult<AppSession> {
        let mut session = self.open(app_id)?;
        session.load(&self.loader).await;
        Ok(session)
    }

    /// The configuration the host was built from.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Discovered manifests.
    #[must_use]
    pub fn registry(&self) -> &HostRegistry {
        &self.registry
    }

    /// The remote loader.
    #[must_use]
    pub fn loader(&self) -> &RemoteLoader {
        &self.loader
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("registry", &self.registry)
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}

fn parse_origin(config: &Config) -> ShellResult<Url> {
    Url::parse(&config.shell.base_url).map_err(|source| ShellError::InvalidBaseUrl {
        url: config.shell.base_url.clone(),
        source,
    })
}
