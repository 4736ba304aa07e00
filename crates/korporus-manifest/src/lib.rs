//! App manifest model and validation for Korporus remotes.
//!
//! Every remote publishes an [`AppManifest`] describing its identity, the
//! location of its remote entry, and the custom elements it contributes to
//! each host [`SlotName`]. Manifests arrive as untrusted JSON, so this crate
//! provides:
//!
//! - [`validate_manifest`]: never-failing structural validation that reports
//!   every problem at once
//! - [`parse_manifest`]: validation plus conversion into the typed model
//! - [`RemoteId`]: the module-system-safe identifier derived from an app id
//! - [`app_manifest_schema`]: the equivalent JSON Schema document
//!
//! # Example
//!
//! ```rust
//! use korporus_manifest::{parse_manifest, validate_manifest, SlotName};
//!
//! let raw = serde_json::json!({
//!     "id": "hello-app",
//!     "name": "Hello",
//!     "icon": "i.svg",
//!     "version": "1.0.0",
//!     "remoteEntry": "http://x/entry.js",
//!     "slots": { "main": "hello-app-main" }
//! });
//!
//! assert!(validate_manifest(&raw).valid);
//! let manifest = parse_manifest(&raw).unwrap();
//! assert_eq!(manifest.slots.get(SlotName::Main), Some("hello-app-main"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod error;
pub mod remote_id;
pub mod schema;
pub mod validate;

pub use error::{ManifestError, ManifestResult};
pub use remote_id::{BOOTSTRAP_MODULE, RemoteId};
pub use schema::{AppManifest, SLOT_NAMES, SlotName, Slots, app_manifest_schema};
pub use validate::{
    REQUIRED_FIELDS, ValidationReport, parse_manifest, parse_manifest_str, validate_manifest,
};
