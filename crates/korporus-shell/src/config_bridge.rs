//! Bridge from `korporus_config::Config` to telemetry types.

use korporus_config::Config;
use korporus_telemetry::{LogConfig, LogFormat};

/// Logging setup described by the `[logging]` section.
///
/// Formats are validated on load; an unparseable one falls back to compact.
#[must_use]
pub fn to_log_config(config: &Config) -> LogConfig {
    let format = config
        .logging
        .format
        .parse::<LogFormat>()
        .unwrap_or_default();
    config.logging.directives.iter().fold(
        LogConfig::new(config.logging.level.to_ascii_lowercase()).with_format(format),
        |log, directive| log.with_directive(directive.clone()),
    )
}
