//! Element definitions and the registry that holds them.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::element::CustomElement;
use crate::error::{ElementError, ElementResult};
use crate::props::{PropSchema, Props};

/// A UI component that can back a custom element.
///
/// Rendering is a pure function of the props: the element calls
/// [`Component::render`] on connect and on every observed attribute change,
/// and stores the returned markup in its render root.
pub trait Component: Send + Sync {
    /// Render markup for the given props.
    fn render(&self, props: &Props) -> String;
}

impl<F> Component for F
where
    F: Fn(&Props) -> String + Send + Sync,
{
    fn render(&self, props: &Props) -> String {
        self(props)
    }
}

/// Per-element options.
#[derive(Debug, Clone, Default)]
pub struct ElementOptions {
    /// Render inside an attached shadow root instead of the element itself.
    /// Off by default so host stylesheets reach the component.
    pub shadow_dom: bool,
    /// Declared attribute-to-prop contract.
    pub props: PropSchema,
}

impl ElementOptions {
    /// Render into a shadow root.
    #[must_use]
    pub fn with_shadow_dom(mut self) -> Self {
        self.shadow_dom = true;
        self
    }

    /// Use the given prop schema.
    #[must_use]
    pub fn with_props(mut self, props: PropSchema) -> Self {
        self.props = props;
        self
    }
}

/// A registered element: tag name, backing component and options.
pub struct ElementDefinition {
    tag_name: String,
    component: Arc<dyn Component>,
    options: ElementOptions,
}

impl ElementDefinition {
    /// The registered tag name.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// The element options.
    #[must_use]
    pub fn options(&self) -> &ElementOptions {
        &self.options
    }

    pub(crate) fn render(&self, props: &Props) -> String {
        self.component.render(props)
    }
}

impl fmt::Debug for ElementDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementDefinition")
            .field("tag_name", &self.tag_name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Check the custom element naming rules this bridge enforces.
fn validate_tag_name(tag: &str) -> ElementResult<()> {
    if !tag.contains('-') {
        return Err(ElementError::InvalidTagName {
            tag: tag.to_owned(),
            reason: "custom element tag names must contain a hyphen".into(),
        });
    }
    if tag.chars().any(char::is_whitespace) {
        return Err(ElementError::InvalidTagName {
            tag: tag.to_owned(),
            reason: "custom element tag names must not contain whitespace".into(),
        });
    }
    Ok(())
}

/// The element definition table of one host document.
///
/// Definitions are never removed or replaced: once a tag is defined, later
/// registrations of the same tag are silent no-ops that return the original
/// definition. Shared between the remote loader (which registers during
/// bootstrap) and the slot mounters (which instantiate).
#[derive(Default)]
pub struct ElementRegistry {
    definitions: RwLock<HashMap<String, Arc<ElementDefinition>>>,
}

impl ElementRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `tag_name` backed by `component`.
    ///
    /// Returns the definition now in effect for the tag. If the tag was
    /// already defined this is the existing definition and `component` is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::InvalidTagName`] if the tag has no hyphen.
    pub fn register_element(
        &self,
        tag_name: &str,
        component: Arc<dyn Component>,
        options: ElementOptions,
    ) -> ElementResult<Arc<ElementDefinition>> {
        validate_tag_name(tag_name)?;

        let mut definitions = self
            .definitions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = definitions.get(tag_name) {
            debug!(tag = tag_name, "Element already defined, skipping registration");
            return Ok(Arc::clone(existing));
        }

        let definition = Arc::new(ElementDefinition {
            tag_name: tag_name.to_owned(),
            component,
            options,
        });
        definitions.insert(tag_name.to_owned(), Arc::clone(&definition));
        info!(
            tag = tag_name,
            shadow_dom = definition.options.shadow_dom,
            "Defined custom element"
        );
        Ok(definition)
    }

    /// Look up a definition.
    #[must_use]
    pub fn get(&self, tag_name: &str) -> Option<Arc<ElementDefinition>> {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tag_name)
            .cloned()
    }

    /// Whether `tag_name` is defined.
    #[must_use]
    pub fn is_defined(&self, tag_name: &str) -> bool {
        self.get(tag_name).is_some()
    }

    /// All defined tags, sorted.
    #[must_use]
    pub fn defined_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        tags.sort_unstable();
        tags
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a detached element of `tag_name`.
    ///
    /// Undefined tags produce an inert element that renders nothing, the
    /// same as an unknown tag in markup, until [`upgrade`](Self::upgrade)
    /// finds a definition for it.
    #[must_use]
    pub fn create_element(&self, tag_name: &str) -> CustomElement {
        let definition = self.get(tag_name);
        if definition.is_none() {
            debug!(tag = tag_name, "Creating element for undefined tag");
        }
        CustomElement::new(tag_name, definition)
    }

    /// Give an inert `element` the definition its tag has since received.
    ///
    /// Returns whether the element was upgraded. A connected element renders
    /// immediately; its attributes are kept.
    pub fn upgrade(&self, element: &mut CustomElement) -> bool {
        if element.is_defined() {
            return false;
        }
        match self.get(element.tag_name()) {
            Some(definition) => {
                debug!(tag = element.tag_name(), "Upgrading element");
                element.upgrade(definition);
                true
            },
            None => false,
        }
    }
}

impl fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRegistry")
            .field("tags", &self.defined_tags())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello() -> Arc<dyn Component> {
        Arc::new(|props: &Props| format!("hello {}", props.text("who").unwrap_or("world")))
    }

    #[test]
    fn rejects_tag_without_hyphen() {
        let registry = ElementRegistry::new();
        let err = registry
            .register_element("nohyphen", hello(), ElementOptions::default())
            .unwrap_err();
        assert!(matches!(err, ElementError::InvalidTagName { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn duplicate_registration_keeps_first_definition() {
        let registry = ElementRegistry::new();
        let first = registry
            .register_element("valid-tag", hello(), ElementOptions::default())
            .unwrap();
        let second = registry
            .register_element(
                "valid-tag",
                Arc::new(|_: &Props| "other".to_owned()),
                ElementOptions::default().with_shadow_dom(),
            )
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
        assert!(!second.options().shadow_dom);
    }

    #[test]
    fn lists_defined_tags_sorted() {
        let registry = ElementRegistry::new();
        for tag in ["b-tag", "a-tag"] {
            registry
                .register_element(tag, hello(), ElementOptions::default())
                .unwrap();
        }
        assert_eq!(registry.defined_tags(), vec!["a-tag", "b-tag"]);
        assert!(registry.is_defined("a-tag"));
        assert!(!registry.is_defined("c-tag"));
    }

    #[test]
    fn create_element_for_undefined_tag_is_inert() {
        let registry = ElementRegistry::new();
        let mut element = registry.create_element("missing-tag");
        element.connect();
        assert!(!element.is_defined());
        assert!(element.render_root().is_none());
    }
}
