//! Layered configuration for Korporus hosts.
//!
//! ```rust,no_run
//! use korporus_config::Config;
//!
//! let resolved = Config::load(Some(std::path::Path::new("."))).unwrap();
//! println!("Discovering from: {:?}", resolved.config.manifests.urls);
//! ```
//!
//! # Precedence
//!
//! From highest to lowest priority:
//!
//! 1. Workspace (`{workspace}/.korporus/config.toml`)
//! 2. User (`~/.korporus/config.toml`)
//! 3. Environment variables (`KORPORUS_*`), for fields no file sets
//! 4. Embedded defaults (`defaults.toml`)

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Dev server port registry.
pub mod ports;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::ResolvedConfig;
pub use ports::{PortEntry, PortRegistry, SHELL_APP_ID};
pub use types::{Config, LoggingSection, ManifestsSection, ShellSection};

impl Config {
    /// Load configuration with the full precedence chain.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the
    /// final configuration fails validation.
    pub fn load(workspace_root: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(workspace_root, None)
    }

    /// Load configuration with an explicit user config directory.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_with_home(
        workspace_root: Option<&std::path::Path>,
        home_dir: &std::path::Path,
    ) -> ConfigResult<ResolvedConfig> {
        loader::load(workspace_root, Some(home_dir))
    }
}
