//! A federation runtime backed by remote entry documents and a catalog of
//! bootstrap modules linked into the host.
//!
//! Registering a remote records where its entry lives. Loading a module
//! fetches the entry document, which lists the module names the deployed
//! remote exposes:
//!
//! ```json
//! { "name": "hello_app", "exposes": ["./bootstrap"] }
//! ```
//!
//! If the requested module is exposed, the implementation linked under the
//! same request (e.g. `hello_app/bootstrap`) is returned.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use async_trait::async_trait;
use korporus_manifest::RemoteId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{RemoteLoadError, RemoteLoadResult};
use crate::runtime::{BootstrapModule, FederationRuntime, RemoteSpec};

/// The artifact a remote entry URL points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntryDocument {
    /// Container name the remote was built under.
    pub name: String,
    /// Exposed module paths, e.g. `./bootstrap`.
    #[serde(default)]
    pub exposes: Vec<String>,
}

impl RemoteEntryDocument {
    /// Whether `module` (without the `./` prefix) is exposed.
    #[must_use]
    pub fn exposes(&self, module: &str) -> bool {
        self.exposes
            .iter()
            .any(|path| path.strip_prefix("./").unwrap_or(path) == module)
    }
}

/// Where remote entry documents come from.
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// Fetch the entry document at an absolute `url`.
    async fn fetch_entry(&self, url: &str) -> RemoteLoadResult<RemoteEntryDocument>;
}

/// Runtime that resolves exposed modules against linked implementations.
pub struct CatalogRuntime {
    entries: Arc<dyn EntrySource>,
    host_name: OnceLock<String>,
    remotes: RwLock<HashMap<RemoteId, String>>,
    modules: RwLock<HashMap<String, Arc<dyn BootstrapModule>>>,
}

impl CatalogRuntime {
    /// Create a runtime fetching entry documents from `entries`.
    #[must_use]
    pub fn new(entries: Arc<dyn EntrySource>) -> Self {
        Self {
            entries,
            host_name: OnceLock::new(),
            remotes: RwLock::new(HashMap::new()),
            modules: RwLock::new(HashMap::new()),
        }
    }

    /// Link an implementation for a module request such as
    /// `hello_app/bootstrap`.
    pub fn link(&self, request: impl Into<String>, module: Arc<dyn BootstrapModule>) {
        let request = request.into();
        debug!(request = %request, "Linked module");
        self.modules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(request, module);
    }

    /// Builder form of [`link`](Self::link).
    #[must_use]
    pub fn with_module(self, request: impl Into<String>, module: Arc<dyn BootstrapModule>) -> Self {
        self.link(request, module);
        self
    }

    /// Host name passed to [`FederationRuntime::init`], once initialized.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.host_name.get().map(String::as_str)
    }

    /// Entry URL currently registered for `remote`.
    #[must_use]
    pub fn registered_entry(&self, remote: &RemoteId) -> Option<String> {
        self.remotes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(remote)
            .cloned()
    }
}

impl std::fmt::Debug for CatalogRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut linked: Vec<String> = self
            .modules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        linked.sort_unstable();
        f.debug_struct("CatalogRuntime")
            .field("host_name", &self.host_name())
            .field("linked", &linked)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl FederationRuntime for CatalogRuntime {
    async fn init(&self, host_name: &str) -> RemoteLoadResult<()> {
        if self.host_name.set(host_name.to_owned()).is_err() {
            debug!(host = host_name, "Catalog runtime already initialized");
        }
        Ok(())
    }

    fn register_remotes(&self, remotes: Vec<RemoteSpec>, force: bool) -> RemoteLoadResult<()> {
        let mut registered = self.remotes.write().unwrap_or_else(PoisonError::into_inner);
        for remote in remotes {
            match registered.get(&remote.name) {
                Some(existing) if !force => {
                    debug!(
                        remote = %remote.name,
                        existing = %existing,
                        "Keeping existing remote registration"
                    );
                },
                _ => {
                    info!(remote = %remote.name, entry = %remote.entry, "Registered remote");
                    registered.insert(remote.name, remote.entry);
                },
            }
        }
        Ok(())
    }

    async fn load_module(&self, request: &str) -> RemoteLoadResult<Arc<dyn BootstrapModule>> {
        let (remote, module) =
            request
                .split_once('/')
                .ok_or_else(|| RemoteLoadError::NotExposed {
                    request: request.to_owned(),
                })?;
        let unknown = || RemoteLoadError::UnknownRemote {
            remote: remote.to_owned(),
        };
        let remote_id = RemoteId::new(remote).map_err(|_| unknown())?;
        let entry_url = self.registered_entry(&remote_id).ok_or_else(unknown)?;

        let document = self.entries.fetch_entry(&entry_url).await?;
        if !document.exposes(module) {
            return Err(RemoteLoadError::NotExposed {
                request: request.to_owned(),
            });
        }

        self.modules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(request)
            .cloned()
            .ok_or_else(|| RemoteLoadError::NotLinked {
                request: request.to_owned(),
            })
    }
}
