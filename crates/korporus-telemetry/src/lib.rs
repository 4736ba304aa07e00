//! Korporus Telemetry - Logging setup for Korporus hosts.
//!
//! One call installs a global `tracing` subscriber built from a
//! [`LogConfig`]: level and per-target directives, output format, and
//! whether logs go to stdout, stderr or a rotating file.
//!
//! # Example
//!
//! ```rust,no_run
//! use korporus_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), korporus_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("korporus_federation=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!("Shell starting");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};
