//! Mounting custom elements into slot containers.

use std::sync::Arc;

use tracing::debug;

use crate::bridge::ElementRegistry;
use crate::container::Container;
use crate::element::CustomElement;

/// Replace the contents of `container` with one new element of `tag_name`.
///
/// Existing children are disconnected first, so their render roots are gone
/// before the new element connects.
pub fn mount_slot<'a>(
    container: &'a mut Container,
    registry: &ElementRegistry,
    tag_name: &str,
) -> &'a mut CustomElement {
    container.clear();
    let element = registry.create_element(tag_name);
    debug!(container = container.name(), tag = tag_name, "Mounting element");
    container.append(element)
}

/// Keeps one element of the desired tag mounted in an owned container.
///
/// Setting a different tag destroys the current element and creates a new
/// one; setting `None` leaves the container empty. Dropping the mounter
/// clears the container.
#[derive(Debug)]
pub struct SlotMounter {
    container: Container,
    registry: Arc<ElementRegistry>,
    tag: Option<String>,
}

impl SlotMounter {
    /// Take ownership of `container`.
    #[must_use]
    pub fn new(container: Container, registry: Arc<ElementRegistry>) -> Self {
        Self {
            container,
            registry,
            tag: None,
        }
    }

    /// Mount `tag`, or clear the slot when `None`.
    ///
    /// Re-mounting the tag that is already mounted keeps the existing
    /// element. If that element was mounted before its tag was defined, it is
    /// upgraded in place.
    pub fn mount(&mut self, tag: Option<&str>) {
        if self.tag.as_deref() == tag {
            if let Some(element) = self.container.first_child_mut() {
                self.registry.upgrade(element);
            }
            return;
        }
        match tag {
            Some(tag) => {
                mount_slot(&mut self.container, &self.registry, tag);
            },
            None => self.container.clear(),
        }
        self.tag = tag.map(str::to_owned);
    }

    /// Clear the container.
    pub fn dispose(&mut self) {
        self.container.clear();
        self.tag = None;
    }

    /// The currently mounted tag.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The mounted element.
    #[must_use]
    pub fn element(&self) -> Option<&CustomElement> {
        self.container.first_child()
    }

    /// Mutable access to the mounted element, e.g. to set attributes.
    pub fn element_mut(&mut self) -> Option<&mut CustomElement> {
        self.container.first_child_mut()
    }

    /// The owned container.
    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }
}

impl Drop for SlotMounter {
    fn drop(&mut self) {
        self.dispose();
    }
}
