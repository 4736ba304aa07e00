//! The "hello" sample remote.
//!
//! Three elements share one language selection: a titlebar with the
//! language badge, the greeting itself, and a settings list to pick the
//! language. Any of them can be pinned to a language with the `lang`
//! attribute.

use std::sync::{Arc, PoisonError, RwLock};

use korporus_elements::{
    Component, ElementDefinition, ElementOptions, ElementRegistry, ElementResult, PropSchema,
    Props,
};
use korporus_federation::BootstrapModule;
use korporus_manifest::RemoteId;

/// App id of the sample remote.
pub const HELLO_APP_ID: &str = "hello-app";

/// Titlebar element tag.
pub const HELLO_TITLEBAR: &str = "hello-app-titlebar";
/// Main element tag.
pub const HELLO_MAIN: &str = "hello-app-main";
/// Settings element tag.
pub const HELLO_SETTINGS: &str = "hello-app-settings";

/// `(code, label, greeting)` for every supported language.
pub const GREETINGS: &[(&str, &str, &str)] = &[
    ("en", "English", "Hello, World!"),
    ("es", "Spanish", "¡Hola, Mundo!"),
    ("fr", "French", "Bonjour, le Monde!"),
    ("ja", "Japanese", "こんにちは、世界！"),
    ("de", "German", "Hallo, Welt!"),
    ("pt", "Portuguese", "Olá, Mundo!"),
];

const DEFAULT_LANGUAGE: &str = "en";

const FALLBACK: (&str, &str, &str) = ("en", "English", "Hello, World!");

fn greeting_for(code: &str) -> (&'static str, &'static str, &'static str) {
    GREETINGS
        .iter()
        .find(|(c, _, _)| *c == code)
        .copied()
        .unwrap_or(FALLBACK)
}

/// Language selection shared by the hello elements.
#[derive(Debug)]
pub struct HelloStore {
    language: RwLock<String>,
}

impl Default for HelloStore {
    fn default() -> Self {
        Self {
            language: RwLock::new(DEFAULT_LANGUAGE.to_owned()),
        }
    }
}

impl HelloStore {
    /// Currently selected language code.
    #[must_use]
    pub fn language(&self) -> String {
        self.language
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Select `code`. Unknown codes are ignored and return `false`.
    pub fn set_language(&self, code: &str) -> bool {
        if !GREETINGS.iter().any(|(c, _, _)| *c == code) {
            return false;
        }
        code.clone_into(&mut self.language.write().unwrap_or_else(PoisonError::into_inner));
        true
    }

    fn effective(&self, props: &Props) -> (&'static str, &'static str, &'static str) {
        match props.text("lang") {
            Some(code) => greeting_for(code),
            None => greeting_for(&self.language()),
        }
    }
}

struct Titlebar(Arc<HelloStore>);

impl Component for Titlebar {
    fn render(&self, props: &Props) -> String {
        let (_, label, _) = self.0.effective(props);
        format!(
            "<div class=\"hello-titlebar\"><span>Hello World</span><span class=\"badge\">{label}</span></div>"
        )
    }
}

struct Main(Arc<HelloStore>);

impl Component for Main {
    fn render(&self, props: &Props) -> String {
        let (_, _, greeting) = self.0.effective(props);
        format!("<p class=\"greeting\">{greeting}</p>")
    }
}

struct Settings(Arc<HelloStore>);

impl Component for Settings {
    fn render(&self, props: &Props) -> String {
        let (selected, _, _) = self.0.effective(props);
        let options: String = GREETINGS
            .iter()
            .map(|(code, label, _)| {
                let pressed = *code == selected;
                format!("<button data-lang=\"{code}\" aria-pressed=\"{pressed}\">{label}</button>")
            })
            .collect();
        format!("<h3>Language</h3><div class=\"languages\">{options}</div>")
    }
}

/// Bootstrap module of the hello remote.
#[derive(Debug, Default)]
pub struct HelloRemote {
    store: Arc<HelloStore>,
}

impl HelloRemote {
    /// Create the remote with a fresh store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared language store.
    #[must_use]
    pub fn store(&self) -> &Arc<HelloStore> {
        &self.store
    }

    /// Module request the remote is linked under (`hello_app/bootstrap`).
    #[must_use]
    pub fn request() -> String {
        RemoteId::from_app_id(HELLO_APP_ID).bootstrap_request()
    }
}

impl BootstrapModule for HelloRemote {
    fn register_all(
        &self,
        elements: &ElementRegistry,
    ) -> ElementResult<Vec<Arc<ElementDefinition>>> {
        let options = || ElementOptions::default().with_props(PropSchema::new().text("lang"));
        Ok(vec![
            elements.register_element(
                HELLO_TITLEBAR,
                Arc::new(Titlebar(Arc::clone(&self.store))),
                options(),
            )?,
            elements.register_element(
                HELLO_MAIN,
                Arc::new(Main(Arc::clone(&self.store))),
                options(),
            )?,
            elements.register_element(
                HELLO_SETTINGS,
                Arc::new(Settings(Arc::clone(&self.store))),
                options().with_shadow_dom(),
            )?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_hello() -> (ElementRegistry, HelloRemote) {
        let registry = ElementRegistry::new();
        let remote = HelloRemote::new();
        remote.register_all(&registry).unwrap();
        (registry, remote)
    }

    #[test]
    fn registers_three_elements() {
        let (registry, _) = registry_with_hello();
        assert_eq!(
            registry.defined_tags(),
            vec![HELLO_MAIN, HELLO_SETTINGS, HELLO_TITLEBAR]
        );
    }

    #[test]
    fn re_registering_is_harmless() {
        let (registry, remote) = registry_with_hello();
        let again = remote.register_all(&registry).unwrap();
        assert_eq!(again.len(), 3);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn greeting_follows_the_store() {
        let (registry, remote) = registry_with_hello();
        let mut main = registry.create_element(HELLO_MAIN);
        main.connect();
        assert!(main.outer_html().contains("Hello, World!"));

        assert!(remote.store().set_language("fr"));
        let mut fresh = registry.create_element(HELLO_MAIN);
        fresh.connect();
        assert!(fresh.outer_html().contains("Bonjour, le Monde!"));
    }

    #[test]
    fn lang_attribute_pins_the_language() {
        let (registry, _) = registry_with_hello();
        let mut titlebar = registry.create_element(HELLO_TITLEBAR);
        titlebar.connect();
        titlebar.set_attribute("lang", "de");
        assert!(titlebar.outer_html().contains("German"));
    }

    #[test]
    fn unknown_languages_fall_back_to_english() {
        let store = HelloStore::default();
        assert!(!store.set_language("xx"));
        assert_eq!(store.language(), "en");
        assert_eq!(greeting_for("xx").2, "Hello, World!");
    }

    #[test]
    fn settings_marks_the_selection() {
        let (registry, remote) = registry_with_hello();
        remote.store().set_language("ja");
        let mut settings = registry.create_element(HELLO_SETTINGS);
        settings.connect();
        let html = settings.outer_html();
        assert!(html.contains("<template shadowrootmode=\"open\">"));
        assert!(html.contains("data-lang=\"ja\" aria-pressed=\"true\""));
        assert!(html.contains("data-lang=\"en\" aria-pressed=\"false\""));
    }

    #[test]
    fn request_uses_the_remote_id() {
        assert_eq!(HelloRemote::request(), "hello_app/bootstrap");
    }
}
