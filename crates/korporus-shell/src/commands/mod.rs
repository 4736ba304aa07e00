//! CLI command handlers.

pub(crate) mod discover;
pub(crate) mod mount;
pub(crate) mod ports;
pub(crate) mod resolve;
pub(crate) mod validate;
