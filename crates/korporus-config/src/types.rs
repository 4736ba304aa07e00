//! Configuration struct definitions.
//!
//! `Default` impls mirror the embedded `defaults.toml`.

use serde::{Deserialize, Serialize};

use crate::ports::PortRegistry;

/// Complete Korporus configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host shell settings.
    pub shell: ShellSection,
    /// Manifest discovery.
    pub manifests: ManifestsSection,
    /// Logging.
    pub logging: LoggingSection,
    /// Dev and preview server ports per app id.
    pub ports: PortRegistry,
}

/// `[shell]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSection {
    /// Name the federation runtime is initialized under.
    pub name: String,
    /// The host's own origin. Relative manifest URLs and remote entries
    /// resolve against it.
    pub base_url: String,
    /// Load remotes straight from their dev servers (see
    /// [`PortRegistry::dev_remote_entry`]).
    pub dev_mode: bool,
}

impl Default for ShellSection {
    fn default() -> Self {
        Self {
            name: "shell".to_owned(),
            base_url: "http://localhost:3000".to_owned(),
            dev_mode: false,
        }
    }
}

/// `[manifests]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestsSection {
    /// Manifest URLs, absolute or relative to `shell.base_url`.
    pub urls: Vec<String>,
}

impl Default for ManifestsSection {
    fn default() -> Self {
        Self {
            urls: vec!["/apps/hello/manifest.json".to_owned()],
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Level filter: trace, debug, info, warn or error.
    pub level: String,
    /// Output format: pretty, compact, json or full.
    pub format: String,
    /// Per-target directives, e.g. `korporus_federation=debug`.
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
