//! Structural validation of untrusted manifest documents.
//!
//! Validation runs in two phases. The presence phase collects every missing
//! top-level key; if any is missing, validation stops there so that absent
//! fields do not also produce type errors. The field phase then checks each
//! field independently and records one field-named message per failure.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ManifestError, ManifestResult};
use crate::schema::{AppManifest, SlotName, Slots};

/// Top-level keys every manifest must carry.
pub const REQUIRED_FIELDS: [&str; 6] = ["id", "name", "icon", "version", "remoteEntry", "slots"];

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+").expect("invalid regex"));

/// Outcome of [`validate_manifest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// `true` when `errors` is empty.
    pub valid: bool,
    /// Every failed check, in document order.
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate a raw JSON value against the manifest rules.
///
/// Never fails: every problem is reported in the returned
/// [`ValidationReport`].
#[must_use]
pub fn validate_manifest(raw: &Value) -> ValidationReport {
    let Some(doc) = raw.as_object() else {
        return ValidationReport::from_errors(vec!["Manifest must be a JSON object".to_owned()]);
    };

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !doc.contains_key(**field))
        .map(|field| format!("Missing required field: \"{field}\""))
        .collect();
    if !missing.is_empty() {
        return ValidationReport::from_errors(missing);
    }

    let mut errors = Vec::new();

    for field in ["id", "name", "icon"] {
        if non_blank(&doc[field]).is_none() {
            errors.push(format!("\"{field}\" must be a non-empty string"));
        }
    }

    if !doc["version"]
        .as_str()
        .is_some_and(|v| VERSION_PATTERN.is_match(v))
    {
        errors.push("\"version\" must be a semver string (e.g. \"1.0.0\")".to_owned());
    }

    if non_blank(&doc["remoteEntry"]).is_none() {
        errors.push("\"remoteEntry\" must be a non-empty string URL".to_owned());
    }

    match doc["slots"].as_object() {
        Some(slots) => validate_slots(slots, &mut errors),
        None => errors.push("\"slots\" must be an object".to_owned()),
    }

    ValidationReport::from_errors(errors)
}

fn validate_slots(slots: &Map<String, Value>, errors: &mut Vec<String>) {
    if slots.is_empty() {
        errors.push("\"slots\" must define at least one slot".to_owned());
    }

    for (key, value) in slots {
        if key.parse::<SlotName>().is_err() {
            errors.push(format!(
                "Unknown slot name \"{key}\". Allowed slots: {}",
                SlotName::allowed_list()
            ));
            continue;
        }
        match non_blank(value) {
            None => errors.push(format!(
                "Slot \"{key}\" must map to a non-empty custom element tag name"
            )),
            Some(tag) if !tag.contains('-') => errors.push(format!(
                "Slot \"{key}\" tag name \"{tag}\" must contain a hyphen"
            )),
            Some(_) => {},
        }
    }
}

/// The string value if it is a string with non-whitespace content.
fn non_blank(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

/// Validate `raw` and convert it into an [`AppManifest`].
///
/// The result contains exactly the validated fields; unexpected keys in the
/// input are dropped.
///
/// # Errors
///
/// Returns [`ManifestError::Invalid`] listing every validation failure.
pub fn parse_manifest(raw: &Value) -> ManifestResult<AppManifest> {
    let report = validate_manifest(raw);
    if !report.valid {
        return Err(ManifestError::Invalid {
            errors: report.errors,
        });
    }

    let text = |key: &str| raw[key].as_str().unwrap_or_default().to_owned();
    let mut slots = Slots::default();
    if let Some(map) = raw["slots"].as_object() {
        for (key, value) in map {
            if let Ok(slot) = key.parse::<SlotName>() {
                slots.set(slot, value.as_str().map(str::to_owned));
            }
        }
    }

    Ok(AppManifest {
        id: text("id"),
        name: text("name"),
        icon: text("icon"),
        version: text("version"),
        remote_entry: text("remoteEntry"),
        slots,
    })
}

/// Parse a manifest from JSON text.
///
/// # Errors
///
/// Returns [`ManifestError::Json`] for malformed JSON and
/// [`ManifestError::Invalid`] for a document that fails validation.
pub fn parse_manifest_str(text: &str) -> ManifestResult<AppManifest> {
    let raw: Value = serde_json::from_str(text)?;
    parse_manifest(&raw)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid() -> Value {
        json!({
            "id": "hello-app",
            "name": "Hello World",
            "icon": "./icon.svg",
            "version": "1.0.0",
            "remoteEntry": "http://localhost:3001/remoteEntry.js",
            "slots": {
                "titlebar": "hello-app-titlebar",
                "main": "hello-app-main",
                "settings": "hello-app-settings"
            }
        })
    }

    fn with(key: &str, value: Value) -> Value {
        let mut doc = valid();
        doc[key] = value;
        doc
    }

    fn without(keys: &[&str]) -> Value {
        let mut doc = valid();
        let map = doc.as_object_mut().unwrap();
        for key in keys {
            map.remove(*key);
        }
        doc
    }

    #[test]
    fn accepts_complete_manifest() {
        let report = validate_manifest(&valid());
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn accepts_hello_app_scenario() {
        let raw = json!({
            "id": "hello-app",
            "name": "Hello",
            "icon": "i.svg",
            "version": "1.0.0",
            "remoteEntry": "http://x/entry.js",
            "slots": { "main": "hello-app-main" }
        });
        assert!(validate_manifest(&raw).valid);
    }

    #[test]
    fn accepts_partial_slots_and_prerelease_versions() {
        assert!(validate_manifest(&with("slots", json!({ "main": "hello-app-main" }))).valid);
        assert!(validate_manifest(&with("version", json!("2.10.3-beta.1"))).valid);
    }

    #[test]
    fn rejects_non_objects() {
        for raw in [json!(null), json!("string"), json!(42), json!([1, 2])] {
            let report = validate_manifest(&raw);
            assert!(!report.valid);
            assert_eq!(report.errors, vec!["Manifest must be a JSON object"]);
        }
    }

    #[test]
    fn reports_all_missing_fields_for_empty_object() {
        let report = validate_manifest(&json!({}));
        assert!(!report.valid);
        let expected: Vec<String> = REQUIRED_FIELDS
            .iter()
            .map(|f| format!("Missing required field: \"{f}\""))
            .collect();
        assert_eq!(report.errors, expected);
    }

    #[test]
    fn reports_exactly_the_missing_subset() {
        // Invalid values elsewhere must not leak into the report while
        // required keys are absent.
        let mut doc = without(&["icon", "slots"]);
        doc["version"] = json!("nope");
        let report = validate_manifest(&doc);
        assert_eq!(
            report.errors,
            vec![
                "Missing required field: \"icon\"".to_owned(),
                "Missing required field: \"slots\"".to_owned(),
            ]
        );
    }

    #[test]
    fn rejects_blank_identity_fields() {
        let report = validate_manifest(&with("id", json!("  ")));
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("\"id\"")));

        let report = validate_manifest(&with("name", json!(7)));
        assert!(report.errors.iter().any(|e| e.contains("\"name\"")));
    }

    #[test]
    fn rejects_non_semver_version() {
        let report = validate_manifest(&with("version", json!("not-a-version")));
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("\"version\"")));
    }

    #[test]
    fn version_digits_are_ascii_only() {
        for version in ["\u{661}.\u{662}.\u{663}", "1.\u{ff12}.3"] {
            let report = validate_manifest(&with("version", json!(version)));
            assert!(!report.valid, "{version} accepted");
        }
    }

    #[test]
    fn rejects_empty_remote_entry() {
        let report = validate_manifest(&with("remoteEntry", json!("")));
        assert!(report.errors.iter().any(|e| e.contains("\"remoteEntry\"")));
    }

    #[test]
    fn field_errors_are_independent() {
        let mut doc = with("id", json!(""));
        doc["version"] = json!("x");
        doc["slots"] = json!("bad");
        let report = validate_manifest(&doc);
        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn rejects_non_object_slots() {
        let report = validate_manifest(&with("slots", json!("bad")));
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("\"slots\"")));
    }

    #[test]
    fn rejects_empty_slots() {
        let report = validate_manifest(&with("slots", json!({})));
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("at least one slot")));
    }

    #[test]
    fn names_each_unknown_slot_and_lists_permitted_set() {
        let report = validate_manifest(&with("slots", json!({ "sidebar": "x", "footer": "y" })));
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors.iter().any(|e| e.contains("\"sidebar\"")));
        assert!(report.errors.iter().any(|e| e.contains("\"footer\"")));
        assert!(
            report
                .errors
                .iter()
                .all(|e| e.contains("titlebar, main, settings"))
        );
    }

    #[test]
    fn rejects_empty_or_non_string_slot_values() {
        let report = validate_manifest(&with("slots", json!({ "main": "" })));
        assert!(report.errors.iter().any(|e| e.contains("\"main\"")));

        let report = validate_manifest(&with("slots", json!({ "settings": 3 })));
        assert!(report.errors.iter().any(|e| e.contains("\"settings\"")));
    }

    #[test]
    fn rejects_tag_without_hyphen() {
        let report = validate_manifest(&with("slots", json!({ "main": "hellomain" })));
        assert!(!report.valid);
        assert!(report.errors[0].contains("must contain a hyphen"));
    }

    #[test]
    fn parse_returns_typed_manifest() {
        let manifest = parse_manifest(&valid()).unwrap();
        assert_eq!(manifest.id, "hello-app");
        assert_eq!(manifest.slots.get(SlotName::Main), Some("hello-app-main"));
    }

    #[test]
    fn parse_drops_unexpected_keys() {
        let mut doc = with("slots", json!({ "main": "hello-app-main" }));
        doc["extra"] = json!({ "nested": true });
        let manifest = parse_manifest(&doc).unwrap();
        let value = serde_json::to_value(&manifest).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["icon", "id", "name", "remoteEntry", "slots", "version"]);
        assert_eq!(value["slots"], json!({ "main": "hello-app-main" }));
    }

    #[test]
    fn parse_aggregates_every_error() {
        let raw = json!({ "id": "x", "name": "X", "icon": "i", "version": "bad" });
        let err = parse_manifest(&raw).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid app manifest:"));
        assert!(message.contains("  - Missing required field: \"remoteEntry\""));
        assert!(message.contains("  - Missing required field: \"slots\""));
        match err {
            ManifestError::Invalid { errors } => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_str_distinguishes_bad_json() {
        assert!(matches!(
            parse_manifest_str("{ not json"),
            Err(ManifestError::Json(_))
        ));
        assert!(matches!(
            parse_manifest_str("{}"),
            Err(ManifestError::Invalid { .. })
        ));
    }
}
