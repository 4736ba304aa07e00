//! Exactly-once remote loading.
//!
//! [`RemoteLoader::load_remote`] is idempotent per [`RemoteId`]:
//!
//! 1. A remote already marked loaded returns immediately, with no network
//!    activity.
//! 2. Otherwise the entry is resolved to an absolute URL, registered with the
//!    runtime (overwriting any stale registration), and the remote's
//!    `bootstrap` module is imported and asked to define its elements.
//! 3. Only after that succeeds is the remote marked loaded.
//!
//! Overlapping calls for the same remote join a single in-flight load and
//! all observe its outcome. Failures are never cached: once a failed load
//! settles, the next call starts a fresh attempt.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use korporus_elements::ElementRegistry;
use korporus_manifest::RemoteId;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::context::{FederationContext, LoadedRemote};
use crate::error::{RemoteLoadError, RemoteLoadResult};
use crate::runtime::{FederationRuntime, RemoteSpec};

type InflightLoad = Shared<BoxFuture<'static, RemoteLoadResult<()>>>;

/// Resolve a manifest's `remoteEntry` against the host origin.
///
/// Entries that already carry an `http://` or `https://` scheme are returned
/// unchanged. Anything else is a path on `origin`, resolved from its root;
/// network-path references such as `//cdn.example/x.js` never leave it.
///
/// # Errors
///
/// Returns [`RemoteLoadError::InvalidEntry`] for blank entries, entries with
/// any other scheme, or entries that do not form a valid URL.
pub fn resolve_entry(origin: &Url, entry: &str) -> RemoteLoadResult<String> {
    if entry.starts_with("http://") || entry.starts_with("https://") {
        return Ok(entry.to_owned());
    }
    let invalid = |message: String| RemoteLoadError::InvalidEntry {
        entry: entry.to_owned(),
        message,
    };
    if entry.trim().is_empty() {
        return Err(invalid("remote entry is empty".to_owned()));
    }
    if let Ok(absolute) = Url::parse(entry) {
        return match absolute.scheme() {
            "http" | "https" => Ok(absolute.into()),
            scheme => Err(invalid(format!("unsupported scheme '{scheme}'"))),
        };
    }
    // Leading slashes would make a network-path reference and leave the origin.
    let path = entry.trim_start_matches(['/', '\\']);
    origin
        .join("/")
        .and_then(|root| root.join(path))
        .map(String::from)
        .map_err(|e| invalid(e.to_string()))
}

/// Loads remotes into a host, at most once each.
pub struct RemoteLoader {
    runtime: Arc<dyn FederationRuntime>,
    elements: Arc<ElementRegistry>,
    context: Arc<FederationContext>,
    origin: Url,
    inflight: Mutex<HashMap<RemoteId, InflightLoad>>,
}

impl RemoteLoader {
    /// Create a loader.
    ///
    /// `origin` is the host's own origin, used to resolve relative remote
    /// entries.
    #[must_use]
    pub fn new(
        runtime: Arc<dyn FederationRuntime>,
        elements: Arc<ElementRegistry>,
        context: Arc<FederationContext>,
        origin: Url,
    ) -> Self {
        Self {
            runtime,
            elements,
            context,
            origin,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// The shared federation state.
    #[must_use]
    pub fn context(&self) -> &Arc<FederationContext> {
        &self.context
    }

    /// The element registry remotes define into.
    #[must_use]
    pub fn elements(&self) -> &Arc<ElementRegistry> {
        &self.elements
    }

    /// The origin relative entries resolve against.
    #[must_use]
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Initialize the runtime once.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteLoadError::Init`] (or whatever the runtime reports)
    /// if initialization fails; a later call retries.
    pub async fn ensure_init(&self) -> RemoteLoadResult<()> {
        self.context.ensure_init(self.runtime.as_ref()).await
    }

    /// Resolve `entry` against this loader's origin.
    ///
    /// # Errors
    ///
    /// See [`resolve_entry`].
    pub fn resolve_entry(&self, entry: &str) -> RemoteLoadResult<String> {
        resolve_entry(&self.origin, entry)
    }

    /// Load `remote_id` from `remote_entry` unless it is already loaded.
    ///
    /// When this returns `Ok`, the remote's elements are defined in
    /// [`elements`](Self::elements).
    ///
    /// # Errors
    ///
    /// Returns the [`RemoteLoadError`] of the attempt. The remote is left
    /// unloaded and a later call retries.
    #[instrument(skip_all, fields(remote_id = %remote_id))]
    pub async fn load_remote(
        &self,
        remote_id: &RemoteId,
        remote_entry: &str,
    ) -> RemoteLoadResult<()> {
        self.ensure_init().await?;

        if self.context.is_loaded(remote_id) {
            debug!("Remote already loaded");
            return Ok(());
        }

        let load = {
            let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(existing) = inflight.get(remote_id) {
                debug!("Joining in-flight load");
                existing.clone()
            } else {
                let entry = self.resolve_entry(remote_entry)?;
                let load = import_remote(
                    Arc::clone(&self.runtime),
                    Arc::clone(&self.elements),
                    Arc::clone(&self.context),
                    remote_id.clone(),
                    entry,
                )
                .boxed()
                .shared();
                inflight.insert(remote_id.clone(), load.clone());
                load
            }
        };

        let result = load.clone().await;

        {
            let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            if inflight.get(remote_id).is_some_and(|current| current.ptr_eq(&load)) {
                inflight.remove(remote_id);
            }
        }

        if let Err(e) = &result {
            warn!(error = %e, "Remote load failed");
        }
        result
    }
}

impl std::fmt::Debug for RemoteLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteLoader")
            .field("origin", &self.origin.as_str())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Register, import and bootstrap one remote. Runs once per in-flight load.
async fn import_remote(
    runtime: Arc<dyn FederationRuntime>,
    elements: Arc<ElementRegistry>,
    context: Arc<FederationContext>,
    remote_id: RemoteId,
    entry: String,
) -> RemoteLoadResult<()> {
    runtime.register_remotes(
        vec![RemoteSpec {
            name: remote_id.clone(),
            entry: entry.clone(),
        }],
        true,
    )?;

    let request = remote_id.bootstrap_request();
    debug!(request = %request, entry = %entry, "Importing bootstrap module");
    let module = runtime.load_module(&request).await?;

    let definitions = module
        .register_all(&elements)
        .map_err(|e| RemoteLoadError::Bootstrap {
            remote_id: remote_id.clone(),
            message: e.to_string(),
        })?;
    let tags: Vec<String> = definitions
        .iter()
        .map(|def| def.tag_name().to_owned())
        .collect();

    info!(remote_id = %remote_id, entry = %entry, elements = ?tags, "Loaded remote");
    context.mark_loaded(
        remote_id,
        LoadedRemote {
            entry,
            elements: tags,
        },
    );
    Ok(())
}
