//! Host-owned regions that hold mounted elements.

use crate::element::CustomElement;

/// A region of the host layout.
///
/// Appending connects the element; removing disconnects it. A container is
/// owned by exactly one slot, which the type system enforces by handing it
/// to a [`SlotMounter`](crate::SlotMounter) by value.
#[derive(Debug)]
pub struct Container {
    name: String,
    children: Vec<CustomElement>,
}

impl Container {
    /// Create an empty region.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Region name, for diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach `element` as the last child and connect it.
    pub fn append(&mut self, mut element: CustomElement) -> &mut CustomElement {
        element.connect();
        let index = self.children.len();
        self.children.push(element);
        &mut self.children[index]
    }

    /// Disconnect and drop every child.
    pub fn clear(&mut self) {
        for mut child in self.children.drain(..) {
            child.disconnect();
        }
    }

    /// Children in document order.
    #[must_use]
    pub fn children(&self) -> &[CustomElement] {
        &self.children
    }

    /// First child, if any.
    #[must_use]
    pub fn first_child(&self) -> Option<&CustomElement> {
        self.children.first()
    }

    /// Mutable access to the first child.
    pub fn first_child_mut(&mut self) -> Option<&mut CustomElement> {
        self.children.first_mut()
    }

    /// Whether the region has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Serialized children.
    #[must_use]
    pub fn inner_html(&self) -> String {
        self.children.iter().map(CustomElement::outer_html).collect()
    }
}
