//! Owned federation state: one-time init flag and the loaded-remote set.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use korporus_manifest::RemoteId;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{RemoteLoadError, RemoteLoadResult};
use crate::runtime::FederationRuntime;

/// Record of a remote whose bootstrap import succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRemote {
    /// Absolute entry URL the remote was loaded from.
    pub entry: String,
    /// Tags the bootstrap module defined.
    pub elements: Vec<String>,
}

/// Federation state owned by one host.
///
/// Replaces ambient module-level flags: every loader that shares a context
/// shares its init state and loaded set. The loaded set only grows, and only
/// the loader writes to it.
#[derive(Debug)]
pub struct FederationContext {
    host_name: String,
    init: OnceCell<()>,
    loaded: RwLock<HashMap<RemoteId, LoadedRemote>>,
}

impl FederationContext {
    /// Create a context for the host named `host_name`.
    #[must_use]
    pub fn new(host_name: impl Into<String>) -> Self {
        Self {
            host_name: host_name.into(),
            init: OnceCell::new(),
            loaded: RwLock::new(HashMap::new()),
        }
    }

    /// The host name the runtime is initialized under.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    /// Whether runtime initialization has completed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.init.initialized()
    }

    /// Initialize `runtime` once. Later calls return immediately; a failed
    /// initialization is not recorded and will be attempted again.
    pub(crate) async fn ensure_init(
        &self,
        runtime: &dyn FederationRuntime,
    ) -> RemoteLoadResult<()> {
        self.init
            .get_or_try_init(|| async {
                runtime.init(&self.host_name).await?;
                info!(host = %self.host_name, "Initialized federation runtime");
                Ok::<(), RemoteLoadError>(())
            })
            .await
            .map(|_| ())
    }

    /// Whether `remote_id` finished loading.
    #[must_use]
    pub fn is_loaded(&self, remote_id: &RemoteId) -> bool {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(remote_id)
    }

    /// The load record for `remote_id`.
    #[must_use]
    pub fn loaded(&self, remote_id: &RemoteId) -> Option<LoadedRemote> {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(remote_id)
            .cloned()
    }

    /// Every loaded remote id, sorted.
    #[must_use]
    pub fn loaded_remotes(&self) -> Vec<RemoteId> {
        let mut ids: Vec<RemoteId> = self
            .loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Record a successful load. The first record for an id wins; returns
    /// whether this call performed the transition.
    pub(crate) fn mark_loaded(&self, remote_id: RemoteId, record: LoadedRemote) -> bool {
        let mut loaded = self.loaded.write().unwrap_or_else(PoisonError::into_inner);
        if loaded.contains_key(&remote_id) {
            debug!(remote_id = %remote_id, "Remote already marked loaded");
            return false;
        }
        loaded.insert(remote_id, record);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(entry: &str) -> LoadedRemote {
        LoadedRemote {
            entry: entry.to_owned(),
            elements: vec!["hello-app-main".to_owned()],
        }
    }

    #[test]
    fn loaded_transition_happens_once() {
        let ctx = FederationContext::new("shell");
        let id = RemoteId::from_app_id("hello-app");
        assert!(!ctx.is_loaded(&id));

        assert!(ctx.mark_loaded(id.clone(), record("http://a/entry.js")));
        assert!(!ctx.mark_loaded(id.clone(), record("http://b/entry.js")));
        assert_eq!(ctx.loaded(&id).unwrap().entry, "http://a/entry.js");
        assert_eq!(ctx.loaded_remotes(), vec![id]);
    }

    #[test]
    fn starts_uninitialized() {
        let ctx = FederationContext::new("shell");
        assert_eq!(ctx.host_name(), "shell");
        assert!(!ctx.is_initialized());
    }
}
