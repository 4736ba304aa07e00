//! Post-merge configuration validation.

use std::collections::HashMap;

use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

/// Validate a fully-merged configuration.
///
/// # Errors
///
/// Returns the first [`ConfigError::ValidationError`] found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_shell(config)?;
    validate_manifests(config)?;
    validate_logging(config)?;
    validate_ports(config)?;
    Ok(())
}

fn validate_shell(config: &Config) -> ConfigResult<()> {
    if config.shell.name.trim().is_empty() {
        return Err(invalid("shell.name", "host name must not be empty"));
    }

    let base = Url::parse(&config.shell.base_url).map_err(|e| {
        invalid(
            "shell.base_url",
            format!("'{}' is not an absolute URL: {e}", config.shell.base_url),
        )
    })?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(invalid(
            "shell.base_url",
            format!("unsupported scheme '{}'; expected http or https", base.scheme()),
        ));
    }
    Ok(())
}

fn validate_manifests(config: &Config) -> ConfigResult<()> {
    if let Some(index) = config
        .manifests
        .urls
        .iter()
        .position(|url| url.trim().is_empty())
    {
        return Err(invalid(
            format!("manifests.urls[{index}]"),
            "manifest URL must not be empty",
        ));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(invalid(
            "logging.level",
            format!(
                "unknown level '{}'; expected one of: {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    let format = config.logging.format.to_ascii_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        return Err(invalid(
            "logging.format",
            format!(
                "unknown format '{}'; expected one of: {}",
                config.logging.format,
                LOG_FORMATS.join(", ")
            ),
        ));
    }
    Ok(())
}

/// Ports must be non-zero, unique per kind, and no port may serve as both a
/// dev and a preview port.
fn validate_ports(config: &Config) -> ConfigResult<()> {
    let mut dev: HashMap<u16, &str> = HashMap::new();
    let mut preview: HashMap<u16, &str> = HashMap::new();

    for (app_id, entry) in config.ports.iter() {
        if entry.dev == 0 || entry.preview == 0 {
            return Err(invalid(format!("ports.{app_id}"), "ports must be non-zero"));
        }
        if let Some(other) = dev.insert(entry.dev, app_id) {
            return Err(invalid(
                format!("ports.{app_id}.dev"),
                format!("dev port {} is already assigned to {other}", entry.dev),
            ));
        }
        if let Some(other) = preview.insert(entry.preview, app_id) {
            return Err(invalid(
                format!("ports.{app_id}.preview"),
                format!("preview port {} is already assigned to {other}", entry.preview),
            ));
        }
    }

    for (port, app_id) in &preview {
        if let Some(other) = dev.get(port) {
            return Err(invalid(
                format!("ports.{app_id}.preview"),
                format!("preview port {port} is {other}'s dev port"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{PortEntry, PortRegistry};

    fn field_of(result: ConfigResult<()>) -> String {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn base_url_must_be_absolute_http() {
        let mut config = Config::default();
        config.shell.base_url = "/relative".to_owned();
        assert_eq!(field_of(validate(&config)), "shell.base_url");

        config.shell.base_url = "ftp://korpor.us".to_owned();
        assert_eq!(field_of(validate(&config)), "shell.base_url");
    }

    #[test]
    fn blank_host_name_is_rejected() {
        let mut config = Config::default();
        config.shell.name = " ".to_owned();
        assert_eq!(field_of(validate(&config)), "shell.name");
    }

    #[test]
    fn blank_manifest_url_names_its_index() {
        let mut config = Config::default();
        config.manifests.urls = vec!["/a.json".to_owned(), String::new()];
        assert_eq!(field_of(validate(&config)), "manifests.urls[1]");
    }

    #[test]
    fn unknown_level_and_format_are_rejected() {
        let mut config = Config::default();
        config.logging.level = "loud".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.level");

        let mut config = Config::default();
        config.logging.format = "xml".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.format");
    }

    #[test]
    fn duplicate_dev_ports_are_rejected() {
        let mut config = Config::default();
        config.ports = PortRegistry::from_entries([
            ("a-app", PortEntry { dev: 3001, preview: 4001 }),
            ("b-app", PortEntry { dev: 3001, preview: 4002 }),
        ]);
        assert_eq!(field_of(validate(&config)), "ports.b-app.dev");
    }

    #[test]
    fn dev_and_preview_ports_must_not_overlap() {
        let mut config = Config::default();
        config.ports = PortRegistry::from_entries([
            ("a-app", PortEntry { dev: 3001, preview: 4001 }),
            ("b-app", PortEntry { dev: 3002, preview: 3001 }),
        ]);
        assert_eq!(field_of(validate(&config)), "ports.b-app.preview");
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = Config::default();
        config.ports = PortRegistry::from_entries([("a-app", PortEntry { dev: 0, preview: 4001 })]);
        assert_eq!(field_of(validate(&config)), "ports.a-app");
    }
}
