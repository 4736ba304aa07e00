//! Dev server port registry.
//!
//! Every app that runs its own dev server has an entry keyed by app id.
//! The `shell` entry belongs to the host; every other entry is a remote.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// App id of the host itself.
pub const SHELL_APP_ID: &str = "shell";

/// File a remote's dev server publishes its entry document under.
pub const DEV_ENTRY_FILE: &str = "mf-manifest.json";

/// Ports for one app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortEntry {
    /// Dev server port.
    pub dev: u16,
    /// Preview server port.
    pub preview: u16,
}

/// Port assignments keyed by app id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortRegistry(BTreeMap<String, PortEntry>);

impl Default for PortRegistry {
    fn default() -> Self {
        Self::from_entries([
            (SHELL_APP_ID, PortEntry { dev: 3000, preview: 4000 }),
            ("hello-app", PortEntry { dev: 3001, preview: 4001 }),
            ("docs-app", PortEntry { dev: 3002, preview: 4002 }),
        ])
    }
}

impl PortRegistry {
    /// Build a registry from `(app_id, entry)` pairs.
    #[must_use]
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, PortEntry)>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(id, entry)| (id.to_owned(), entry))
                .collect(),
        )
    }

    /// Ports for `app_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownApp`] when the app has no assignment.
    pub fn port_entry(&self, app_id: &str) -> ConfigResult<PortEntry> {
        self.0
            .get(app_id)
            .copied()
            .ok_or_else(|| ConfigError::UnknownApp {
                app_id: app_id.to_owned(),
            })
    }

    /// Dev server port for `app_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownApp`] when the app has no assignment.
    pub fn dev_port(&self, app_id: &str) -> ConfigResult<u16> {
        self.port_entry(app_id).map(|entry| entry.dev)
    }

    /// Dev server origin for `app_id`, e.g. `http://localhost:3001`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownApp`] when the app has no assignment.
    pub fn dev_origin(&self, app_id: &str) -> ConfigResult<String> {
        self.dev_port(app_id).map(localhost)
    }

    /// Dev origins of every remote (all apps except the shell).
    #[must_use]
    pub fn dev_remote_origins(&self) -> BTreeMap<String, String> {
        self.remotes()
            .map(|(id, entry)| (id.clone(), localhost(entry.dev)))
            .collect()
    }

    /// Ids of every remote app, sorted.
    #[must_use]
    pub fn remote_app_ids(&self) -> Vec<String> {
        self.remotes().map(|(id, _)| id.clone()).collect()
    }

    /// Entry URL to load `app_id` from its own dev server, if it has one.
    ///
    /// Remotes served by a dev server only resolve their internal module
    /// paths on their own origin, so in dev mode the host bypasses the
    /// deployed entry and loads from there.
    #[must_use]
    pub fn dev_remote_entry(&self, app_id: &str) -> Option<String> {
        if app_id == SHELL_APP_ID {
            return None;
        }
        self.0
            .get(app_id)
            .map(|entry| format!("{}/{DEV_ENTRY_FILE}", localhost(entry.dev)))
    }

    /// All assignments, sorted by app id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PortEntry)> {
        self.0.iter().map(|(id, entry)| (id.as_str(), *entry))
    }

    /// Number of apps with an assignment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn remotes(&self) -> impl Iterator<Item = (&String, &PortEntry)> {
        self.0.iter().filter(|(id, _)| id.as_str() != SHELL_APP_ID)
    }
}

fn localhost(port: u16) -> String {
    format!("http://localhost:{port}")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn known_app_has_both_ports() {
        let entry = PortRegistry::default().port_entry("hello-app").unwrap();
        assert_eq!(entry.dev, 3001);
        assert_eq!(entry.preview, 4001);
    }

    #[test]
    fn unknown_app_fails_fast() {
        let err = PortRegistry::default().port_entry("nonexistent").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownApp { ref app_id } if app_id == "nonexistent"));
        assert!(err.to_string().contains("no port assignment"));
    }

    #[test]
    fn dev_ports_and_origins() {
        let ports = PortRegistry::default();
        assert_eq!(ports.dev_port(SHELL_APP_ID).unwrap(), 3000);
        assert_eq!(ports.dev_port("docs-app").unwrap(), 3002);
        assert_eq!(ports.dev_origin("hello-app").unwrap(), "http://localhost:3001");
    }

    #[test]
    fn remote_origins_exclude_the_shell() {
        let origins = PortRegistry::default().dev_remote_origins();
        assert!(!origins.contains_key(SHELL_APP_ID));
        assert_eq!(origins["hello-app"], "http://localhost:3001");
        assert_eq!(origins["docs-app"], "http://localhost:3002");
        assert_eq!(
            PortRegistry::default().remote_app_ids(),
            vec!["docs-app", "hello-app"]
        );
    }

    #[test]
    fn dev_entry_points_at_the_remote_dev_server() {
        let ports = PortRegistry::default();
        assert_eq!(
            ports.dev_remote_entry("hello-app").as_deref(),
            Some("http://localhost:3001/mf-manifest.json")
        );
        assert_eq!(ports.dev_remote_entry(SHELL_APP_ID), None);
        assert_eq!(ports.dev_remote_entry("unknown"), None);
    }

    #[test]
    fn default_ports_are_unique_and_disjoint() {
        let ports = PortRegistry::default();
        let dev: HashSet<u16> = ports.iter().map(|(_, e)| e.dev).collect();
        let preview: HashSet<u16> = ports.iter().map(|(_, e)| e.preview).collect();
        assert_eq!(dev.len(), ports.len());
        assert_eq!(preview.len(), ports.len());
        assert!(dev.is_disjoint(&preview));
    }
}
