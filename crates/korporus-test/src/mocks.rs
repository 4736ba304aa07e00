//! Mock implementations of the federation seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use korporus_elements::{
    Component, ElementDefinition, ElementOptions, ElementRegistry, ElementResult, Props,
};
use korporus_federation::{
    BootstrapModule, EntrySource, FederationRuntime, ManifestFetchError, ManifestSource,
    RemoteEntryDocument, RemoteLoadError, RemoteLoadResult, RemoteSpec,
};
use serde_json::Value;

/// Decrement `counter` if it is positive. Returns whether it was.
fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[derive(Debug, Clone)]
enum MockResponse {
    Json(Value),
    Status(u16),
    Transport(String),
}

/// Manifest source serving canned responses.
///
/// URLs without a canned response answer HTTP 404.
#[derive(Debug, Default)]
pub struct MockManifestSource {
    responses: HashMap<String, MockResponse>,
    requests: Mutex<Vec<String>>,
}

impl MockManifestSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `document` at `url`.
    #[must_use]
    pub fn with_manifest(mut self, url: impl Into<String>, document: Value) -> Self {
        self.responses.insert(url.into(), MockResponse::Json(document));
        self
    }

    /// Answer `url` with an HTTP error status.
    #[must_use]
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), MockResponse::Status(status));
        self
    }

    /// Fail `url` at the transport level.
    #[must_use]
    pub fn with_transport_error(mut self, url: impl Into<String>, message: &str) -> Self {
        self.responses
            .insert(url.into(), MockResponse::Transport(message.to_owned()));
        self
    }

    /// URLs requested so far, in request order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ManifestSource for MockManifestSource {
    async fn fetch_json(&self, url: &str) -> Result<Value, ManifestFetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_owned());
        match self.responses.get(url) {
            Some(MockResponse::Json(value)) => Ok(value.clone()),
            Some(MockResponse::Status(status)) => Err(ManifestFetchError::Status {
                url: url.to_owned(),
                status: *status,
            }),
            Some(MockResponse::Transport(message)) => Err(ManifestFetchError::Transport {
                url: url.to_owned(),
                message: message.clone(),
            }),
            None => Err(ManifestFetchError::Status {
                url: url.to_owned(),
                status: 404,
            }),
        }
    }
}

/// Entry source serving canned entry documents.
#[derive(Debug, Default)]
pub struct MockEntrySource {
    documents: HashMap<String, RemoteEntryDocument>,
    fetches: AtomicUsize,
}

impl MockEntrySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve an entry for `name` exposing `modules` at `url`.
    #[must_use]
    pub fn with_entry(mut self, url: impl Into<String>, name: &str, modules: &[&str]) -> Self {
        self.documents.insert(
            url.into(),
            RemoteEntryDocument {
                name: name.to_owned(),
                exposes: modules.iter().map(|m| format!("./{m}")).collect(),
            },
        );
        self
    }

    /// Number of fetches so far.
    #[must_use]
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntrySource for MockEntrySource {
    async fn fetch_entry(&self, url: &str) -> RemoteLoadResult<RemoteEntryDocument> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| RemoteLoadError::EntryFetch {
                url: url.to_owned(),
                message: "HTTP 404".to_owned(),
            })
    }
}

/// Component recording every render.
///
/// Renders `<span data-tag="{tag}">{props}</span>` where props are listed
/// as `name=value` pairs.
#[derive(Debug)]
pub struct RecordingComponent {
    tag: String,
    renders: Mutex<Vec<Props>>,
}

impl RecordingComponent {
    /// Create a component for `tag`.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            renders: Mutex::new(Vec::new()),
        }
    }

    /// Props of every render so far.
    #[must_use]
    pub fn renders(&self) -> Vec<Props> {
        self.renders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of renders so far.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.renders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Component for RecordingComponent {
    fn render(&self, props: &Props) -> String {
        self.renders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(props.clone());
        let listed: Vec<String> = props
            .iter()
            .map(|(name, value)| match value.as_text() {
                Some(text) => format!("{name}={text}"),
                None => format!("{name}={value:?}"),
            })
            .collect();
        format!("<span data-tag=\"{}\">{}</span>", self.tag, listed.join(" "))
    }
}

/// Bootstrap module that registers a [`RecordingComponent`] per tag and
/// counts its invocations.
#[derive(Debug)]
pub struct CountingBootstrap {
    tags: Vec<String>,
    calls: AtomicUsize,
}

impl CountingBootstrap {
    /// Register `tags` on every call.
    #[must_use]
    pub fn new(tags: &[&str]) -> Self {
        Self {
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// A bootstrap whose registration always fails (its tag has no hyphen).
    #[must_use]
    pub fn failing() -> Self {
        Self::new(&["broken"])
    }

    /// Number of `register_all` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BootstrapModule for CountingBootstrap {
    fn register_all(
        &self,
        elements: &ElementRegistry,
    ) -> ElementResult<Vec<Arc<ElementDefinition>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tags
            .iter()
            .map(|tag| {
                elements.register_element(
                    tag,
                    Arc::new(RecordingComponent::new(tag.as_str())),
                    ElementOptions::default(),
                )
            })
            .collect()
    }
}

/// Federation runtime with scripted behaviour and call counters.
#[derive(Default)]
pub struct MockRuntime {
    modules: Mutex<HashMap<String, Arc<dyn BootstrapModule>>>,
    registrations: Mutex<Vec<(RemoteSpec, bool)>>,
    init_calls: AtomicUsize,
    load_calls: AtomicUsize,
    init_failures: AtomicUsize,
    load_failures: AtomicUsize,
    load_delay: Option<Duration>,
}

impl MockRuntime {
    /// Create a runtime with no modules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `module` for `request`, e.g. `hello_app/bootstrap`.
    #[must_use]
    pub fn with_module(self, request: &str, module: Arc<dyn BootstrapModule>) -> Self {
        self.modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(request.to_owned(), module);
        self
    }

    /// Sleep for `delay` inside every `load_module`.
    #[must_use]
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = Some(delay);
        self
    }

    /// Fail the next `times` init calls.
    #[must_use]
    pub fn failing_init(self, times: usize) -> Self {
        self.init_failures.store(times, Ordering::SeqCst);
        self
    }

    /// Fail the next `times` module loads with a network error.
    #[must_use]
    pub fn failing_loads(self, times: usize) -> Self {
        self.load_failures.store(times, Ordering::SeqCst);
        self
    }

    /// Number of `init` calls so far.
    #[must_use]
    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    /// Number of `load_module` calls so far.
    #[must_use]
    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    /// Every `register_remotes` entry so far, with its `force` flag.
    #[must_use]
    pub fn registrations(&self) -> Vec<(RemoteSpec, bool)> {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl std::fmt::Debug for MockRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRuntime")
            .field("init_calls", &self.init_calls())
            .field("load_calls", &self.load_calls())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl FederationRuntime for MockRuntime {
    async fn init(&self, _host_name: &str) -> RemoteLoadResult<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if take_one(&self.init_failures) {
            return Err(RemoteLoadError::Init("simulated init failure".to_owned()));
        }
        Ok(())
    }

    fn register_remotes(&self, remotes: Vec<RemoteSpec>, force: bool) -> RemoteLoadResult<()> {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(remotes.into_iter().map(|spec| (spec, force)));
        Ok(())
    }

    async fn load_module(&self, request: &str) -> RemoteLoadResult<Arc<dyn BootstrapModule>> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.load_delay {
            tokio::time::sleep(delay).await;
        }
        if take_one(&self.load_failures) {
            return Err(RemoteLoadError::EntryFetch {
                url: request.to_owned(),
                message: "simulated network failure".to_owned(),
            });
        }
        self.modules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(request)
            .cloned()
            .ok_or_else(|| RemoteLoadError::NotExposed {
                request: request.to_owned(),
            })
    }
}
