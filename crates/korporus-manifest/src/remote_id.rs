//! Module-system-safe remote identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ManifestError, ManifestResult};

/// Name of the module every remote exposes for element registration.
pub const BOOTSTRAP_MODULE: &str = "bootstrap";

/// Identifier under which a remote is registered with the federation runtime.
///
/// Module systems only accept word characters (`[A-Za-z0-9_]`) in container
/// names, so app ids such as `hello-app` map to `hello_app`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RemoteId(String);

impl<'de> Deserialize<'de> for RemoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl RemoteId {
    /// Create a remote id from a string that is already module-system-safe.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::InvalidRemoteId`] if the id is empty or
    /// contains non-word characters.
    pub fn new(id: impl Into<String>) -> ManifestResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(ManifestError::InvalidRemoteId {
                id,
                reason: "remote id must not be empty".into(),
            });
        }
        if !id.chars().all(is_word_char) {
            return Err(ManifestError::InvalidRemoteId {
                reason: "remote id must contain only letters, digits and underscores".into(),
                id,
            });
        }
        Ok(Self(id))
    }

    /// Derive the remote id for an app id, substituting `_` for every
    /// non-word character.
    #[must_use]
    pub fn from_app_id(app_id: &str) -> Self {
        Self(
            app_id
                .chars()
                .map(|c| if is_word_char(c) { c } else { '_' })
                .collect(),
        )
    }

    /// The inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Module request for an exposed module, e.g. `hello_app/bootstrap`.
    #[must_use]
    pub fn module_request(&self, module: &str) -> String {
        format!("{}/{module}", self.0)
    }

    /// Module request for this remote's bootstrap module.
    #[must_use]
    pub fn bootstrap_request(&self) -> String {
        self.module_request(BOOTSTRAP_MODULE)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RemoteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_from_app_id() {
        assert_eq!(RemoteId::from_app_id("hello-app").as_str(), "hello_app");
        assert_eq!(RemoteId::from_app_id("docs.app v2").as_str(), "docs_app_v2");
        assert_eq!(RemoteId::from_app_id("plain").as_str(), "plain");
    }

    #[test]
    fn derived_ids_always_validate() {
        for app_id in ["hello-app", "a/b", "ünï", "x--y"] {
            let derived = RemoteId::from_app_id(app_id);
            assert!(RemoteId::new(derived.as_str()).is_ok(), "{app_id}");
        }
    }

    #[test]
    fn rejects_unsafe_ids() {
        assert!(RemoteId::new("").is_err());
        assert!(RemoteId::new("hello-app").is_err());
        assert!(RemoteId::new("a/b").is_err());
        assert!(RemoteId::new("hello_app").is_ok());
    }

    #[test]
    fn builds_bootstrap_request() {
        let id = RemoteId::from_app_id("hello-app");
        assert_eq!(id.bootstrap_request(), "hello_app/bootstrap");
    }

    #[test]
    fn deserialize_validates() {
        assert!(serde_json::from_str::<RemoteId>("\"hello_app\"").is_ok());
        assert!(serde_json::from_str::<RemoteId>("\"hello-app\"").is_err());
    }
}
