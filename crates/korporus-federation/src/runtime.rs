//! Seams between the loader and a module federation runtime.

use std::sync::Arc;

use async_trait::async_trait;
use korporus_elements::{ElementDefinition, ElementRegistry, ElementResult};
use korporus_manifest::RemoteId;

use crate::error::RemoteLoadResult;

/// A remote to register: its container name and absolute entry URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSpec {
    /// Container name the remote is addressed by.
    pub name: RemoteId,
    /// Absolute URL of the remote entry artifact.
    pub entry: String,
}

/// The module federation runtime the loader drives.
#[async_trait]
pub trait FederationRuntime: Send + Sync {
    /// One-time initialization under the host's name.
    ///
    /// Called at most once per [`FederationContext`](crate::FederationContext).
    async fn init(&self, host_name: &str) -> RemoteLoadResult<()>;

    /// Register remotes. With `force`, an existing registration under the
    /// same name is overwritten instead of kept.
    fn register_remotes(&self, remotes: Vec<RemoteSpec>, force: bool) -> RemoteLoadResult<()>;

    /// Import an exposed module by request (`<remote>/<module>`).
    async fn load_module(&self, request: &str) -> RemoteLoadResult<Arc<dyn BootstrapModule>>;
}

/// A remote's bootstrap module.
///
/// Registration is an explicit call rather than an import side effect, so
/// the loader can observe exactly which elements a remote defined.
pub trait BootstrapModule: Send + Sync {
    /// Define every element this remote contributes.
    ///
    /// Must tolerate being called against a registry that already holds
    /// some of the tags (duplicate registration is a no-op).
    ///
    /// # Errors
    ///
    /// Returns an [`ElementError`](korporus_elements::ElementError) if an
    /// element cannot be defined.
    fn register_all(
        &self,
        elements: &ElementRegistry,
    ) -> ElementResult<Vec<Arc<ElementDefinition>>>;
}
