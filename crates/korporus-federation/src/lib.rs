//! Manifest discovery and exactly-once remote loading for Korporus hosts.
//!
//! The shell learns about remotes from manifests and turns them into mounted
//! custom elements in three steps:
//!
//! 1. [`load_manifests`] fetches every configured manifest URL concurrently
//!    through a [`ManifestSource`], validates each document and keeps the
//!    valid subset. The result is cached in a [`HostRegistry`].
//! 2. [`RemoteLoader::load_remote`] registers a remote's entry with the
//!    [`FederationRuntime`] and imports its bootstrap module, at most once per
//!    [`RemoteId`](korporus_manifest::RemoteId). The bootstrap module's
//!    [`BootstrapModule::register_all`] defines the remote's elements.
//! 3. Slot mounting (in `korporus-elements`) instantiates those elements.
//!
//! # Single-writer state
//!
//! The only shared mutable state is the loaded-remote set inside
//! [`FederationContext`]. It is written exclusively by the loader after a
//! bootstrap import succeeds.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod catalog;
pub mod context;
pub mod discovery;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod loader;
pub mod runtime;
pub mod store;

pub use catalog::{CatalogRuntime, EntrySource, RemoteEntryDocument};
pub use context::{FederationContext, LoadedRemote};
pub use discovery::{ManifestSource, fetch_manifest, load_manifests};
pub use error::{DiscoveryError, ManifestFetchError, RemoteLoadError, RemoteLoadResult};
#[cfg(feature = "http")]
pub use http::{HttpEntrySource, HttpManifestSource};
pub use loader::{RemoteLoader, resolve_entry};
pub use runtime::{BootstrapModule, FederationRuntime, RemoteSpec};
pub use store::HostRegistry;
