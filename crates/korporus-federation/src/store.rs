//! Host-side cache of discovered manifests.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use korporus_manifest::AppManifest;
use tracing::warn;

use crate::discovery::{ManifestSource, load_manifests};

#[derive(Debug, Default)]
struct RegistryState {
    apps: Arc<[AppManifest]>,
    loaded: bool,
}

/// Validated manifests known to the host, shared with the UI layer.
///
/// The list is replaced wholesale and handed out as an immutable snapshot.
/// App ids are unique: when discovery yields the same id twice, the first
/// manifest is kept.
#[derive(Debug, Default)]
pub struct HostRegistry {
    state: RwLock<RegistryState>,
}

impl HostRegistry {
    /// Create an empty, not-yet-loaded registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the manifest list and mark the registry loaded.
    pub fn set_apps(&self, apps: Vec<AppManifest>) {
        let mut seen = HashSet::new();
        let apps: Vec<AppManifest> = apps
            .into_iter()
            .filter(|app| {
                let fresh = seen.insert(app.id.clone());
                if !fresh {
                    warn!(app_id = %app.id, "Dropping manifest with duplicate app id");
                }
                fresh
            })
            .collect();

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.apps = apps.into();
        state.loaded = true;
    }

    /// Run discovery over `urls` and store the result. Returns the number of
    /// apps now registered.
    pub async fn refresh<S>(&self, source: &S, urls: &[String]) -> usize
    where
        S: ManifestSource + ?Sized,
    {
        let apps = load_manifests(source, urls).await;
        self.set_apps(apps);
        self.apps().len()
    }

    /// Snapshot of the current manifest list.
    #[must_use]
    pub fn apps(&self) -> Arc<[AppManifest]> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner).apps)
    }

    /// Whether discovery has completed at least once.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .loaded
    }

    /// Look up a manifest by app id.
    #[must_use]
    pub fn find(&self, app_id: &str) -> Option<AppManifest> {
        self.apps().iter().find(|app| app.id == app_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use korporus_manifest::Slots;

    use super::*;

    fn manifest(id: &str, name: &str) -> AppManifest {
        AppManifest {
            id: id.to_owned(),
            name: name.to_owned(),
            icon: "i.svg".to_owned(),
            version: "1.0.0".to_owned(),
            remote_entry: format!("/apps/{id}/remoteEntry.js"),
            slots: Slots {
                main: Some(format!("{id}-main")),
                ..Slots::default()
            },
        }
    }

    #[test]
    fn starts_empty_and_unloaded() {
        let registry = HostRegistry::new();
        assert!(!registry.is_loaded());
        assert!(registry.apps().is_empty());
        assert!(registry.find("hello-app").is_none());
    }

    #[test]
    fn set_apps_marks_loaded_even_when_empty() {
        let registry = HostRegistry::new();
        registry.set_apps(Vec::new());
        assert!(registry.is_loaded());
    }

    #[test]
    fn finds_by_id() {
        let registry = HostRegistry::new();
        registry.set_apps(vec![manifest("hello-app", "Hello"), manifest("docs-app", "Docs")]);
        assert_eq!(registry.find("docs-app").unwrap().name, "Docs");
        assert_eq!(registry.apps().len(), 2);
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let registry = HostRegistry::new();
        registry.set_apps(vec![manifest("hello-app", "First"), manifest("hello-app", "Second")]);
        assert_eq!(registry.apps().len(), 1);
        assert_eq!(registry.find("hello-app").unwrap().name, "First");
    }

    #[test]
    fn snapshots_are_immutable() {
        let registry = HostRegistry::new();
        registry.set_apps(vec![manifest("hello-app", "Hello")]);
        let before = registry.apps();
        registry.set_apps(Vec::new());
        assert_eq!(before.len(), 1);
        assert!(registry.apps().is_empty());
    }
}
