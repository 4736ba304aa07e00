//! Environment variable fallbacks.
//!
//! Environment variables only fill fields that no config file set. A value
//! written in `config.toml` always wins over the environment.

use std::collections::{HashMap, HashSet};

use tracing::debug;

/// Overrides `shell.base_url`.
pub const ENV_BASE_URL: &str = "KORPORUS_BASE_URL";
/// Overrides `manifests.urls` (comma-separated).
pub const ENV_MANIFEST_URLS: &str = "KORPORUS_MANIFEST_URLS";
/// Overrides `logging.level`.
pub const ENV_LOG_LEVEL: &str = "KORPORUS_LOG_LEVEL";

#[derive(Clone, Copy)]
enum EnvKind {
    Text,
    List,
}

const FALLBACKS: &[(&str, &str, EnvKind)] = &[
    (ENV_BASE_URL, "shell.base_url", EnvKind::Text),
    (ENV_MANIFEST_URLS, "manifests.urls", EnvKind::List),
    (ENV_LOG_LEVEL, "logging.level", EnvKind::Text),
];

/// Snapshot every `KORPORUS_*` variable of the current process.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with("KORPORUS_"))
        .collect()
}

/// Apply fallbacks for fields not in `set_by_files`. Returns the dotted paths
/// that were filled from the environment.
pub(crate) fn apply_env_fallbacks(
    merged: &mut toml::Value,
    set_by_files: &HashSet<String>,
    env_vars: &HashMap<String, String>,
) -> Vec<String> {
    let mut applied = Vec::new();
    for &(var, path, kind) in FALLBACKS {
        let Some(raw) = env_vars.get(var) else {
            continue;
        };
        if set_by_files.contains(path) {
            debug!(var, path, "config file value takes precedence over environment");
            continue;
        }
        let value = match kind {
            EnvKind::Text => toml::Value::String(raw.trim().to_owned()),
            EnvKind::List => toml::Value::Array(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| toml::Value::String(s.to_owned()))
                    .collect(),
            ),
        };
        if set_path(merged, path, value) {
            applied.push(path.to_owned());
        }
    }
    applied
}

/// Write `value` at a dotted `path`, creating intermediate tables.
fn set_path(root: &mut toml::Value, path: &str, value: toml::Value) -> bool {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return false;
    };
    let mut current = root;
    for segment in segments {
        let Some(table) = current.as_table_mut() else {
            return false;
        };
        current = table
            .entry(segment)
            .or_insert(toml::Value::Table(toml::map::Map::new()));
    }
    match current.as_table_mut() {
        Some(table) => {
            table.insert(leaf.to_owned(), value);
            true
        },
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn fills_unset_fields() {
        let mut merged: toml::Value = toml::from_str("[shell]\nname = \"shell\"").unwrap();
        let applied = apply_env_fallbacks(
            &mut merged,
            &HashSet::new(),
            &env(&[
                (ENV_BASE_URL, "https://korpor.us"),
                (ENV_MANIFEST_URLS, "/a.json, /b.json,,"),
            ]),
        );

        assert_eq!(applied, vec!["shell.base_url", "manifests.urls"]);
        assert_eq!(merged["shell"]["base_url"].as_str(), Some("https://korpor.us"));
        let urls: Vec<&str> = merged["manifests"]["urls"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(toml::Value::as_str)
            .collect();
        assert_eq!(urls, vec!["/a.json", "/b.json"]);
    }

    #[test]
    fn file_values_win() {
        let mut merged: toml::Value =
            toml::from_str("[logging]\nlevel = \"warn\"").unwrap();
        let set: HashSet<String> = ["logging.level".to_owned()].into();
        let applied = apply_env_fallbacks(&mut merged, &set, &env(&[(ENV_LOG_LEVEL, "trace")]));

        assert!(applied.is_empty());
        assert_eq!(merged["logging"]["level"].as_str(), Some("warn"));
    }
}
