//! Test fixtures for manifests and remotes.

use korporus_manifest::{AppManifest, parse_manifest};
use serde_json::{Value, json};

/// A valid manifest document for `id`, with a tag in every slot.
///
/// Tags are `{id}-titlebar`, `{id}-main` and `{id}-settings`; the entry is
/// `/apps/{id}/remoteEntry.js`.
#[must_use]
pub fn test_manifest_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("{id} app"),
        "icon": format!("/apps/{id}/icon.svg"),
        "version": "1.0.0",
        "remoteEntry": format!("/apps/{id}/remoteEntry.js"),
        "slots": {
            "titlebar": format!("{id}-titlebar"),
            "main": format!("{id}-main"),
            "settings": format!("{id}-settings"),
        }
    })
}

/// The "hello" app manifest as deployed at `/apps/hello/manifest.json`.
#[must_use]
pub fn hello_manifest_json() -> Value {
    json!({
        "id": "hello-app",
        "name": "Hello World",
        "icon": "/apps/hello/icon.svg",
        "version": "1.0.0",
        "remoteEntry": "/apps/hello/remoteEntry.js",
        "slots": {
            "titlebar": "hello-app-titlebar",
            "main": "hello-app-main",
            "settings": "hello-app-settings"
        }
    })
}

/// A parsed manifest for `id`. See [`test_manifest_json`].
///
/// # Panics
///
/// Never for ids made of word characters and hyphens.
#[must_use]
pub fn test_manifest(id: &str) -> AppManifest {
    parse_manifest(&test_manifest_json(id)).expect("fixture manifest is valid")
}
