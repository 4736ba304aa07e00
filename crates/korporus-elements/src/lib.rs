//! Custom element bridge and slot mounting for Korporus hosts.
//!
//! Remotes contribute UI as custom elements. This crate adapts any
//! [`Component`] to the custom element contract and mounts those elements
//! into host-owned regions:
//!
//! - [`ElementRegistry`]: the element definition table (`define` semantics,
//!   duplicate registration is a silent no-op)
//! - [`PropSchema`]: the declared attribute-to-prop contract of an element
//! - [`CustomElement`]: one element instance with its connect / attribute /
//!   disconnect lifecycle
//! - [`Container`] and [`SlotMounter`]: exclusive host regions and the mounter
//!   that keeps one element of the desired tag inside each

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod bridge;
pub mod container;
pub mod element;
pub mod error;
pub mod props;
pub mod slot;

pub use bridge::{Component, ElementDefinition, ElementOptions, ElementRegistry};
pub use container::Container;
pub use element::{CustomElement, RenderRoot, RootMode, html_escape};
pub use error::{ElementError, ElementResult};
pub use props::{PropDecl, PropKind, PropSchema, PropValue, Props, kebab_to_camel};
pub use slot::{SlotMounter, mount_slot};
