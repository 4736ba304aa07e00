//! Korporus host shell.
//!
//! Wires configuration, manifest discovery and remote loading into app
//! sessions. An [`AppSession`] loads one app's remote and mounts its
//! titlebar, main and settings elements into a [`ShellLayout`].
//!
//! The crate also carries the "hello" sample remote ([`hello`]) linked into
//! the default HTTP host.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod config_bridge;
pub mod error;
pub mod hello;
pub mod host;
pub mod session;

pub use error::{ShellError, ShellResult};
pub use hello::HelloRemote;
pub use host::Host;
pub use session::{AppSession, LoadState, ShellLayout};
