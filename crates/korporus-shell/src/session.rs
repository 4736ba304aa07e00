//! App sessions: load a remote, then mount its slots into the shell layout.

use std::fmt;
use std::sync::Arc;

use korporus_elements::{Container, ElementRegistry, SlotMounter, html_escape};
use korporus_federation::RemoteLoader;
use korporus_manifest::{AppManifest, RemoteId, SLOT_NAMES, SlotName, Slots};
use tracing::{info, warn};

/// Progress of an app's remote load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing attempted yet.
    #[default]
    Idle,
    /// A load is in progress.
    Loading,
    /// The remote's elements are defined and the slots are mounted.
    Loaded,
    /// The last attempt failed; loading again retries.
    Error(String),
}

impl LoadState {
    /// Whether the app is ready.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }

    /// Failure message of the last attempt.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Loading => f.write_str("loading"),
            Self::Loaded => f.write_str("loaded"),
            Self::Error(message) => write!(f, "error: {message}"),
        }
    }
}

/// The three shell regions, one per slot.
#[derive(Debug)]
pub struct ShellLayout {
    titlebar: SlotMounter,
    main: SlotMounter,
    settings: SlotMounter,
}

impl ShellLayout {
    /// Create an empty layout instantiating elements from `elements`.
    #[must_use]
    pub fn new(elements: &Arc<ElementRegistry>) -> Self {
        let region = |slot: SlotName| SlotMounter::new(Container::new(slot.as_str()), Arc::clone(elements));
        Self {
            titlebar: region(SlotName::Titlebar),
            main: region(SlotName::Main),
            settings: region(SlotName::Settings),
        }
    }

    /// Mount every declared slot and clear the undeclared ones.
    pub fn mount(&mut self, slots: &Slots) {
        for slot in SLOT_NAMES {
            self.region_mut(slot).mount(slots.get(slot));
        }
    }

    /// Empty every region.
    pub fn clear(&mut self) {
        for slot in SLOT_NAMES {
            self.region_mut(slot).dispose();
        }
    }

    /// The region for `slot`.
    #[must_use]
    pub fn region(&self, slot: SlotName) -> &SlotMounter {
        match slot {
            SlotName::Titlebar => &self.titlebar,
            SlotName::Main => &self.main,
            SlotName::Settings => &self.settings,
        }
    }

    /// Mutable region for `slot`.
    pub fn region_mut(&mut self, slot: SlotName) -> &mut SlotMounter {
        match slot {
            SlotName::Titlebar => &mut self.titlebar,
            SlotName::Main => &mut self.main,
            SlotName::Settings => &mut self.settings,
        }
    }

    /// Serialize the layout. The settings panel is `hidden` unless open.
    #[must_use]
    pub fn render(&self, settings_open: bool) -> String {
        let hidden = if settings_open { "" } else { " hidden" };
        format!(
            "<header data-slot=\"titlebar\">{}</header>\n<main data-slot=\"main\">{}</main>\n<aside data-slot=\"settings\"{hidden}>{}</aside>",
            self.titlebar.container().inner_html(),
            self.main.container().inner_html(),
            self.settings.container().inner_html(),
        )
    }
}

/// One app opened in the shell.
#[derive(Debug)]
pub struct AppSession {
    manifest: AppManifest,
    remote_id: RemoteId,
    entry: String,
    state: LoadState,
    layout: ShellLayout,
    settings_open: bool,
}

impl AppSession {
    /// Open `manifest`, mounting into elements from `elements`.
    ///
    /// `elements` must be the registry the loader defines into.
    #[must_use]
    pub fn new(manifest: AppManifest, elements: &Arc<ElementRegistry>) -> Self {
        Self {
            remote_id: RemoteId::from_app_id(&manifest.id),
            entry: manifest.remote_entry.clone(),
            manifest,
            state: LoadState::Idle,
            layout: ShellLayout::new(elements),
            settings_open: false,
        }
    }

    /// Load from `entry` instead of the manifest's `remoteEntry`.
    #[must_use]
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = entry.into();
        self
    }

    /// Load the app's remote and mount its slots.
    ///
    /// A no-op once loaded. After a failure the state holds the error
    /// message, the slots stay empty, and calling this again retries.
    pub async fn load(&mut self, loader: &RemoteLoader) -> &LoadState {
        if self.state.is_loaded() {
            return &self.state;
        }
        self.state = LoadState::Loading;

        match loader.load_remote(&self.remote_id, &self.entry).await {
            Ok(()) => {
                self.layout.mount(&self.manifest.slots);
                info!(app_id = %self.manifest.id, slots = self.manifest.slots.len(), "Mounted app");
                self.state = LoadState::Loaded;
            },
            Err(e) => {
                warn!(app_id = %self.manifest.id, error = %e, "Failed to load app");
                self.layout.clear();
                self.state = LoadState::Error(e.to_string());
            },
        }
        &self.state
    }

    /// The app's manifest.
    #[must_use]
    pub fn manifest(&self) -> &AppManifest {
        &self.manifest
    }

    /// Remote the app loads from.
    #[must_use]
    pub fn remote_id(&self) -> &RemoteId {
        &self.remote_id
    }

    /// Entry the app loads from, as given (relative or absolute).
    #[must_use]
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Current load state.
    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// The mounted regions.
    #[must_use]
    pub fn layout(&self) -> &ShellLayout {
        &self.layout
    }

    /// Mutable access to the mounted regions.
    pub fn layout_mut(&mut self) -> &mut ShellLayout {
        &mut self.layout
    }

    /// Whether the settings panel is open.
    #[must_use]
    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    /// Open or close the settings panel. Returns the new state.
    pub fn toggle_settings(&mut self) -> bool {
        self.settings_open = !self.settings_open;
        self.settings_open
    }

    /// Serialize the session view for its current state.
    #[must_use]
    pub fn render(&self) -> String {
        let name = html_escape(&self.manifest.name);
        match &self.state {
            LoadState::Idle | LoadState::Loading => {
                format!("<p class=\"loading\">Loading {name}…</p>")
            },
            LoadState::Error(message) => format!(
                "<div class=\"error\"><p>Failed to load {name}</p><p>{}</p></div>",
                html_escape(message)
            ),
            LoadState::Loaded => self.layout.render(self.settings_open),
        }
    }
}

#[cfg(test)]
mod tests {
    use korporus_elements::ElementOptions;

    use super::*;

    fn registry() -> Arc<ElementRegistry> {
        let registry = ElementRegistry::new();
        for tag in ["demo-titlebar", "demo-main"] {
            let component = move |_: &korporus_elements::Props| format!("[{tag}]");
            registry
                .register_element(tag, Arc::new(component), ElementOptions::default())
                .unwrap();
        }
        Arc::new(registry)
    }

    fn slots(titlebar: Option<&str>, main: Option<&str>) -> Slots {
        Slots {
            titlebar: titlebar.map(str::to_owned),
            main: main.map(str::to_owned),
            settings: None,
        }
    }

    #[test]
    fn layout_mounts_declared_slots_only() {
        let elements = registry();
        let mut layout = ShellLayout::new(&elements);
        layout.mount(&slots(Some("demo-titlebar"), Some("demo-main")));

        assert_eq!(layout.region(SlotName::Titlebar).tag(), Some("demo-titlebar"));
        assert_eq!(layout.region(SlotName::Main).tag(), Some("demo-main"));
        assert!(layout.region(SlotName::Settings).container().is_empty());

        let html = layout.render(false);
        assert!(html.contains("<header data-slot=\"titlebar\"><demo-titlebar>[demo-titlebar]</demo-titlebar></header>"));
        assert!(html.contains("<aside data-slot=\"settings\" hidden></aside>"));
    }

    #[test]
    fn remounting_clears_dropped_slots() {
        let elements = registry();
        let mut layout = ShellLayout::new(&elements);
        layout.mount(&slots(Some("demo-titlebar"), Some("demo-main")));
        layout.mount(&slots(None, Some("demo-main")));

        assert!(layout.region(SlotName::Titlebar).container().is_empty());
        assert_eq!(layout.region(SlotName::Main).tag(), Some("demo-main"));

        layout.clear();
        assert!(layout.region(SlotName::Main).container().is_empty());
    }

    #[test]
    fn load_state_display_and_accessors() {
        assert_eq!(LoadState::default(), LoadState::Idle);
        assert_eq!(LoadState::Loading.to_string(), "loading");
        let failed = LoadState::Error("boom".to_owned());
        assert_eq!(failed.error(), Some("boom"));
        assert_eq!(failed.to_string(), "error: boom");
        assert!(!failed.is_loaded());
    }

    #[test]
    fn error_view_escapes_name_and_message() {
        let mut manifest = korporus_test::test_manifest("demo-app");
        manifest.name = "<Demo & Co>".to_owned();
        let mut session = AppSession::new(manifest, &registry());
        session.state = LoadState::Error("bad entry '<script>'".to_owned());

        assert_eq!(
            session.render(),
            "<div class=\"error\"><p>Failed to load &lt;Demo &amp; Co&gt;</p>\
             <p>bad entry &#39;&lt;script&gt;&#39;</p></div>"
        );
    }
}
