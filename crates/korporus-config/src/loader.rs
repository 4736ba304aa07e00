//! Config file discovery and layered loading.
//!
//! 1. Parse the embedded `defaults.toml`
//! 2. Merge `~/.korporus/config.toml` (user)
//! 3. Merge `{workspace}/.korporus/config.toml` (workspace)
//! 4. Apply environment fallbacks for fields no file set
//! 5. Deserialize and validate

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: usize = 1_048_576;

/// Directory holding Korporus config, under the home or workspace root.
pub const CONFIG_DIR: &str = ".korporus";

/// A loaded configuration and where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The merged, validated configuration.
    pub config: Config,
    /// Config files that contributed, in merge order.
    pub loaded_files: Vec<String>,
    /// Dotted field paths filled from environment variables.
    pub env_fields: Vec<String>,
}

/// Load configuration with the full precedence chain.
///
/// `workspace_root` enables the workspace layer. `home_override` replaces
/// `~/.korporus` as the directory holding the user config file.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is malformed or the merged
/// configuration fails validation.
pub fn load(
    workspace_root: Option<&Path>,
    home_override: Option<&Path>,
) -> ConfigResult<ResolvedConfig> {
    load_with_env(workspace_root, home_override, &collect_env_vars())
}

/// [`load`] with an explicit environment snapshot.
///
/// # Errors
///
/// See [`load`].
pub fn load_with_env(
    workspace_root: Option<&Path>,
    home_override: Option<&Path>,
    env_vars: &HashMap<String, String>,
) -> ConfigResult<ResolvedConfig> {
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;
    let mut set_by_files = HashSet::new();
    let mut loaded_files = Vec::new();

    let user_dir = match home_override {
        Some(dir) => dir.to_path_buf(),
        None => home_directory()?.join(CONFIG_DIR),
    };
    let mut layers = vec![("user", user_dir.join("config.toml"))];
    if let Some(root) = workspace_root {
        layers.push(("workspace", root.join(CONFIG_DIR).join("config.toml")));
    }

    for (layer, path) in layers {
        if let Some(overlay) = try_load_file(&path)? {
            merge_tracking(&mut merged, &overlay, "", &mut set_by_files);
            info!(layer, path = %path.display(), "loaded config");
            loaded_files.push(path.display().to_string());
        }
    }

    let env_fields = apply_env_fallbacks(&mut merged, &set_by_files, env_vars);
    if !env_fields.is_empty() {
        debug!(fields = ?env_fields, "applied environment variable fallbacks");
    }

    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged config>".to_owned(),
                source: e,
            })?;
    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        loaded_files,
        env_fields,
    })
}

/// Load a config from a single file over the built-in defaults.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read or parsed, or the
/// result fails validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let content = read_bounded(path)?;
    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;
    validate::validate(&config)?;
    Ok(config)
}

fn read_bounded(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    if content.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit",
                content.len()
            ),
        });
    }
    Ok(content)
}

/// Load a file, or `None` if it does not exist.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match read_bounded(path) {
        Ok(content) => content,
        Err(ConfigError::ReadError { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => return Err(e),
    };

    toml::from_str(&content)
        .map(Some)
        .map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            source: e,
        })
}

/// Deep-merge `overlay` into `base`, recording every leaf path the overlay
/// sets. Tables merge per key; scalars and arrays replace.
fn merge_tracking(
    base: &mut toml::Value,
    overlay: &toml::Value,
    prefix: &str,
    set: &mut HashSet<String>,
) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                match base_table.get_mut(key) {
                    Some(base_val) => merge_tracking(base_val, overlay_val, &path, set),
                    None => {
                        base_table.insert(key.clone(), overlay_val.clone());
                        record_leaves(overlay_val, &path, set);
                    },
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
            set.insert(prefix.to_owned());
        },
    }
}

fn record_leaves(val: &toml::Value, prefix: &str, set: &mut HashSet<String>) {
    match val {
        toml::Value::Table(table) => {
            for (key, child) in table {
                record_leaves(child, &format!("{prefix}.{key}"), set);
            }
        },
        _ => {
            set.insert(prefix.to_owned());
        },
    }
}

fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_default_impls() {
        let config: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_try_load_file_missing() {
        let result = try_load_file(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_file_nonexistent() {
        let result = load_file(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_merge_tracks_overlay_leaves() {
        let mut base: toml::Value = toml::from_str(DEFAULTS_TOML).unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
            [shell]
            base_url = "https://korpor.us"

            [ports.notes-app]
            dev = 3003
            preview = 4003
        "#,
        )
        .unwrap();

        let mut set = HashSet::new();
        merge_tracking(&mut base, &overlay, "", &mut set);

        assert_eq!(base["shell"]["name"].as_str(), Some("shell"));
        assert_eq!(base["shell"]["base_url"].as_str(), Some("https://korpor.us"));
        assert_eq!(base["ports"]["hello-app"]["dev"].as_integer(), Some(3001));
        assert!(set.contains("shell.base_url"));
        assert!(set.contains("ports.notes-app.dev"));
        assert!(!set.contains("shell.name"));
    }

    #[test]
    fn test_oversized_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("huge.toml");
        let data = "x = \"".to_owned() + &"a".repeat(1_100_000) + "\"";
        std::fs::write(&file_path, data).unwrap();

        let result = try_load_file(&file_path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
