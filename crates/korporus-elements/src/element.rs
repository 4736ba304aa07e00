//! Custom element instances and their lifecycle.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::trace;

use crate::bridge::ElementDefinition;
use crate::props::Props;

/// Escape text for safe inclusion in HTML text content and quoted
/// attribute values.
#[must_use]
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Where a component renders relative to its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootMode {
    /// Directly inside the element, reachable by host stylesheets.
    Light,
    /// Inside an open shadow root attached to the element.
    Shadow,
}

/// Rendering root created on connect and destroyed on disconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRoot {
    mode: RootMode,
    markup: String,
    renders: usize,
}

impl RenderRoot {
    fn new(mode: RootMode) -> Self {
        Self {
            mode,
            markup: String::new(),
            renders: 0,
        }
    }

    /// Light or shadow placement.
    #[must_use]
    pub fn mode(&self) -> RootMode {
        self.mode
    }

    /// Markup produced by the most recent render.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// How many times the component rendered into this root.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.renders
    }
}

/// One element instance.
///
/// Created detached. [`connect`](Self::connect) creates the render root and
/// renders; attribute changes re-render while connected;
/// [`disconnect`](Self::disconnect) destroys the root so no further
/// rendering happens.
#[derive(Debug)]
pub struct CustomElement {
    tag_name: String,
    attributes: Vec<(String, String)>,
    definition: Option<Arc<ElementDefinition>>,
    connected: bool,
    root: Option<RenderRoot>,
}

impl CustomElement {
    pub(crate) fn new(tag_name: &str, definition: Option<Arc<ElementDefinition>>) -> Self {
        Self {
            tag_name: tag_name.to_owned(),
            attributes: Vec::new(),
            definition,
            connected: false,
            root: None,
        }
    }

    /// The element's tag name.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Whether the element has a definition, from creation or an upgrade.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.definition.is_some()
    }

    /// Whether the element is attached to a container.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Current value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// The render root, present only while a defined element is connected.
    #[must_use]
    pub fn render_root(&self) -> Option<&RenderRoot> {
        self.root.as_ref()
    }

    /// Props the component would currently receive.
    #[must_use]
    pub fn props(&self) -> Props {
        match &self.definition {
            Some(def) => def.options().props.resolve(&self.attributes),
            None => Props::default(),
        }
    }

    /// Set an attribute, re-rendering if the element observes it.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_owned(), value)),
        }
        self.attribute_changed(name);
    }

    /// Remove an attribute, re-rendering if the element observes it.
    pub fn remove_attribute(&mut self, name: &str) {
        let before = self.attributes.len();
        self.attributes.retain(|(n, _)| n != name);
        if self.attributes.len() != before {
            self.attribute_changed(name);
        }
    }

    fn attribute_changed(&mut self, name: &str) {
        let observed = self
            .definition
            .as_ref()
            .is_some_and(|def| def.options().props.observes(name));
        if observed {
            self.render();
        }
    }

    /// Attach: create the render root and render.
    pub fn connect(&mut self) {
        if self.connected {
            return;
        }
        self.connected = true;
        self.attach_root();
    }

    pub(crate) fn upgrade(&mut self, definition: Arc<ElementDefinition>) {
        self.definition = Some(definition);
        if self.connected {
            self.attach_root();
        }
    }

    fn attach_root(&mut self) {
        if let Some(def) = &self.definition {
            let mode = if def.options().shadow_dom {
                RootMode::Shadow
            } else {
                RootMode::Light
            };
            self.root = Some(RenderRoot::new(mode));
            self.render();
        }
    }

    /// Detach: destroy the render root.
    pub fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        self.connected = false;
        if self.root.take().is_some() {
            trace!(tag = %self.tag_name, "Destroyed render root");
        }
    }

    fn render(&mut self) {
        let Some(def) = &self.definition else {
            return;
        };
        let props = def.options().props.resolve(&self.attributes);
        if let Some(root) = self.root.as_mut() {
            root.markup = def.render(&props);
            root.renders = root.renders.saturating_add(1);
        }
    }

    /// Serialize the element and its rendered content as HTML.
    #[must_use]
    pub fn outer_html(&self) -> String {
        let mut html = format!("<{}", self.tag_name);
        for (name, value) in &self.attributes {
            let _ = write!(html, " {name}=\"{}\"", html_escape(value));
        }
        html.push('>');
        if let Some(root) = &self.root {
            match root.mode {
                RootMode::Light => html.push_str(&root.markup),
                RootMode::Shadow => {
                    let _ = write!(
                        html,
                        "<template shadowrootmode=\"open\">{}</template>",
                        root.markup
                    );
                },
            }
        }
        let _ = write!(html, "</{}>", self.tag_name);
        html
    }
}
