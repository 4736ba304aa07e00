//! Manifest types and the equivalent JSON Schema.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of mount points a host layout offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotName {
    /// The strip above the app content.
    Titlebar,
    /// The primary content region.
    Main,
    /// The settings panel.
    Settings,
}

/// Every slot name, in layout order.
pub const SLOT_NAMES: [SlotName; 3] = [SlotName::Titlebar, SlotName::Main, SlotName::Settings];

impl SlotName {
    /// The manifest key for this slot.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Titlebar => "titlebar",
            Self::Main => "main",
            Self::Settings => "settings",
        }
    }

    /// Comma-separated list of permitted slot keys, for diagnostics.
    #[must_use]
    pub fn allowed_list() -> String {
        SLOT_NAMES
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SLOT_NAMES
            .into_iter()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| format!("unknown slot name \"{s}\""))
    }
}

/// Slot-to-tag mapping. Absent slots render nothing in the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Slots {
    /// Tag mounted in the titlebar region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titlebar: Option<String>,
    /// Tag mounted in the main content region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    /// Tag mounted in the settings panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<String>,
}

impl Slots {
    /// The tag configured for `slot`, if any.
    #[must_use]
    pub fn get(&self, slot: SlotName) -> Option<&str> {
        match slot {
            SlotName::Titlebar => self.titlebar.as_deref(),
            SlotName::Main => self.main.as_deref(),
            SlotName::Settings => self.settings.as_deref(),
        }
    }

    /// Set or clear the tag for `slot`.
    pub fn set(&mut self, slot: SlotName, tag: Option<String>) {
        match slot {
            SlotName::Titlebar => self.titlebar = tag,
            SlotName::Main => self.main = tag,
            SlotName::Settings => self.settings = tag,
        }
    }

    /// Configured slots in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotName, &str)> {
        SLOT_NAMES
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|tag| (slot, tag)))
    }

    /// Number of configured slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether no slot is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// A validated app manifest.
///
/// Only ever constructed through [`parse_manifest`](crate::parse_manifest)
/// (or deserialized from a document that already passed it), so every field
/// holds a non-empty string and `slots` names at least one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppManifest {
    /// Unique app identifier within a host.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Icon reference (URL or path).
    pub icon: String,
    /// Semantic version, `MAJOR.MINOR.PATCH` prefix.
    pub version: String,
    /// Absolute or origin-relative URL of the remote entry artifact.
    pub remote_entry: String,
    /// Tags contributed to each host slot.
    pub slots: Slots,
}

/// JSON Schema (draft 2020-12) equivalent to the validator's rules.
///
/// Usable with any external JSON Schema validator. The hyphen requirement on
/// tag names is expressed as a pattern.
#[must_use]
pub fn app_manifest_schema() -> serde_json::Value {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "AppManifest",
        "type": "object",
        "required": ["id", "name", "icon", "version", "remoteEntry", "slots"],
        "additionalProperties": false,
        "properties": {
            "id": { "type": "string", "minLength": 1 },
            "name": { "type": "string", "minLength": 1 },
            "icon": { "type": "string", "minLength": 1 },
            "version": { "type": "string", "pattern": "^[0-9]+\\.[0-9]+\\.[0-9]+" },
            "remoteEntry": { "type": "string", "minLength": 1 },
            "slots": {
                "type": "object",
                "additionalProperties": false,
                "minProperties": 1,
                "properties": {
                    "titlebar": { "type": "string", "minLength": 1, "pattern": "-" },
                    "main": { "type": "string", "minLength": 1, "pattern": "-" },
                    "settings": { "type": "string", "minLength": 1, "pattern": "-" }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_names_round_trip_through_str() {
        for slot in SLOT_NAMES {
            assert_eq!(slot.as_str().parse::<SlotName>().unwrap(), slot);
        }
        assert!("sidebar".parse::<SlotName>().is_err());
    }

    #[test]
    fn allowed_list_is_in_layout_order() {
        assert_eq!(SlotName::allowed_list(), "titlebar, main, settings");
    }

    #[test]
    fn slots_iterate_only_configured_entries() {
        let mut slots = Slots::default();
        assert!(slots.is_empty());
        slots.set(SlotName::Settings, Some("x-settings".into()));
        slots.set(SlotName::Main, Some("x-main".into()));
        let collected: Vec<_> = slots.iter().collect();
        assert_eq!(
            collected,
            vec![(SlotName::Main, "x-main"), (SlotName::Settings, "x-settings")]
        );
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn manifest_serializes_with_camel_case_keys() {
        let manifest = AppManifest {
            id: "hello-app".into(),
            name: "Hello".into(),
            icon: "i.svg".into(),
            version: "1.0.0".into(),
            remote_entry: "/apps/hello/remoteEntry.js".into(),
            slots: Slots {
                main: Some("hello-app-main".into()),
                ..Slots::default()
            },
        };
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["remoteEntry"], "/apps/hello/remoteEntry.js");
        assert!(value["slots"].get("titlebar").is_none());
    }

    #[test]
    fn schema_requires_every_top_level_field() {
        let schema = app_manifest_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(
            required,
            crate::REQUIRED_FIELDS.to_vec(),
            "schema and validator must agree on required fields"
        );
    }
}
