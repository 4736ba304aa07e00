//! Declared attribute-to-prop contracts.
//!
//! Attributes always arrive as strings. A [`PropSchema`] declares which
//! attributes an element cares about and how each one is parsed. The
//! default [`PropKind::Text`] forwards the raw string unchanged, so no
//! coercion happens unless an element asks for it.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

/// Convert a kebab-case attribute name to its camelCase prop name.
///
/// Only a hyphen followed by a lowercase ASCII letter is folded, so
/// `user-id` becomes `userId` while `item-2` is left unchanged.
#[must_use]
pub fn kebab_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-'
            && let Some(next) = chars.peek().copied()
            && next.is_ascii_lowercase()
        {
            out.push(next.to_ascii_uppercase());
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

/// How an attribute string becomes a prop value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropKind {
    /// Raw string, unconverted.
    #[default]
    Text,
    /// Signed 64-bit integer.
    Integer,
    /// Finite floating point number.
    Number,
    /// Boolean attribute: present-and-empty, `true`, or the attribute's own
    /// name mean `true`; `false` means `false`.
    Boolean,
    /// Arbitrary JSON, for structured payloads encoded in an attribute.
    Json,
}

/// A parsed prop value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropValue {
    /// From [`PropKind::Text`] or an undeclared attribute.
    Text(String),
    /// From [`PropKind::Integer`].
    Integer(i64),
    /// From [`PropKind::Number`].
    Number(f64),
    /// From [`PropKind::Boolean`].
    Boolean(bool),
    /// From [`PropKind::Json`].
    Json(serde_json::Value),
}

impl PropValue {
    /// The string payload, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl PropKind {
    fn parse(self, attribute: &str, raw: &str) -> Result<PropValue, String> {
        match self {
            Self::Text => Ok(PropValue::Text(raw.to_owned())),
            Self::Integer => raw
                .trim()
                .parse::<i64>()
                .map(PropValue::Integer)
                .map_err(|e| e.to_string()),
            Self::Number => match raw.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(PropValue::Number(n)),
                Ok(_) => Err("value is not finite".to_owned()),
                Err(e) => Err(e.to_string()),
            },
            Self::Boolean => match raw.trim() {
                "" | "true" => Ok(PropValue::Boolean(true)),
                "false" => Ok(PropValue::Boolean(false)),
                other if other == attribute => Ok(PropValue::Boolean(true)),
                other => Err(format!("expected a boolean, got '{other}'")),
            },
            Self::Json => serde_json::from_str(raw)
                .map(PropValue::Json)
                .map_err(|e| e.to_string()),
        }
    }
}

/// One declared prop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropDecl {
    /// Attribute name as written in markup (kebab-case).
    pub attribute: String,
    /// Prop name handed to the component (camelCase).
    pub name: String,
    /// Parser applied to the attribute string.
    pub kind: PropKind,
}

/// Declared prop contract of an element.
///
/// Declared attributes are observed: changing one re-renders a connected
/// element. Undeclared attributes are forwarded and observed as text props
/// unless the schema is [`strict`](PropSchema::strict), in which case they
/// are ignored entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropSchema {
    decls: Vec<PropDecl>,
    accept_undeclared: bool,
}

impl Default for PropSchema {
    fn default() -> Self {
        Self {
            decls: Vec::new(),
            accept_undeclared: true,
        }
    }
}

impl PropSchema {
    /// An empty schema that forwards and observes every attribute as text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a prop for `attribute` with the given parser.
    ///
    /// Re-declaring an attribute replaces the earlier declaration.
    #[must_use]
    pub fn prop(mut self, attribute: impl Into<String>, kind: PropKind) -> Self {
        let attribute = attribute.into();
        self.decls.retain(|d| d.attribute != attribute);
        self.decls.push(PropDecl {
            name: kebab_to_camel(&attribute),
            attribute,
            kind,
        });
        self
    }

    /// Declare a raw-string prop.
    #[must_use]
    pub fn text(self, attribute: impl Into<String>) -> Self {
        self.prop(attribute, PropKind::Text)
    }

    /// Ignore undeclared attributes: they neither reach the component nor
    /// trigger re-renders.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.accept_undeclared = false;
        self
    }

    /// The declarations, in declaration order.
    #[must_use]
    pub fn decls(&self) -> &[PropDecl] {
        &self.decls
    }

    /// Declared attribute names.
    #[must_use]
    pub fn observed_attributes(&self) -> Vec<&str> {
        self.decls.iter().map(|d| d.attribute.as_str()).collect()
    }

    /// Whether a change to `attribute` should re-render the element.
    #[must_use]
    pub fn observes(&self, attribute: &str) -> bool {
        self.accept_undeclared || self.decl(attribute).is_some()
    }

    fn decl(&self, attribute: &str) -> Option<&PropDecl> {
        self.decls.iter().find(|d| d.attribute == attribute)
    }

    /// Build component props from the element's current attributes.
    ///
    /// A declared attribute whose value fails to parse is left out of the
    /// props and logged; the component sees it as absent.
    #[must_use]
    pub fn resolve(&self, attributes: &[(String, String)]) -> Props {
        let mut props = Props::default();
        for (attribute, raw) in attributes {
            match self.decl(attribute) {
                Some(decl) => match decl.kind.parse(attribute, raw) {
                    Ok(value) => {
                        props.0.insert(decl.name.clone(), value);
                    },
                    Err(error) => {
                        warn!(
                            attribute = %attribute,
                            kind = ?decl.kind,
                            error = %error,
                            "Dropping attribute that does not match its declared prop kind"
                        );
                    },
                },
                None if self.accept_undeclared => {
                    props
                        .0
                        .insert(kebab_to_camel(attribute), PropValue::Text(raw.clone()));
                },
                None => {},
            }
        }
        props
    }
}

/// Inputs handed to a component on each render, keyed by camelCase name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Props(BTreeMap<String, PropValue>);

impl Props {
    /// Look up a prop.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.0.get(name)
    }

    /// Look up a text prop.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropValue::as_text)
    }

    /// Number of props.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no props.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate props in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn kebab_to_camel_folds_lowercase_segments() {
        assert_eq!(kebab_to_camel("user-id"), "userId");
        assert_eq!(kebab_to_camel("data-long-name"), "dataLongName");
        assert_eq!(kebab_to_camel("plain"), "plain");
        assert_eq!(kebab_to_camel("item-2"), "item-2");
        assert_eq!(kebab_to_camel("trailing-"), "trailing-");
    }

    #[test]
    fn undeclared_attributes_pass_through_as_raw_strings() {
        let props = PropSchema::new().resolve(&attrs(&[("max-count", "42"), ("enabled", "true")]));
        assert_eq!(props.text("maxCount"), Some("42"));
        assert_eq!(props.text("enabled"), Some("true"));
    }

    #[test]
    fn declared_kinds_parse_values() {
        let schema = PropSchema::new()
            .prop("max-count", PropKind::Integer)
            .prop("ratio", PropKind::Number)
            .prop("compact", PropKind::Boolean)
            .prop("config", PropKind::Json)
            .text("label");
        let props = schema.resolve(&attrs(&[
            ("max-count", " 42 "),
            ("ratio", "0.5"),
            ("compact", ""),
            ("config", r#"{"a":1}"#),
            ("label", "007"),
        ]));
        assert_eq!(props.get("maxCount"), Some(&PropValue::Integer(42)));
        assert_eq!(props.get("ratio"), Some(&PropValue::Number(0.5)));
        assert_eq!(props.get("compact"), Some(&PropValue::Boolean(true)));
        assert_eq!(
            props.get("config"),
            Some(&PropValue::Json(serde_json::json!({ "a": 1 })))
        );
        assert_eq!(props.text("label"), Some("007"));
    }

    #[test]
    fn boolean_accepts_attribute_name_and_false() {
        let schema = PropSchema::new().prop("hidden", PropKind::Boolean);
        let props = schema.resolve(&attrs(&[("hidden", "hidden")]));
        assert_eq!(props.get("hidden"), Some(&PropValue::Boolean(true)));
        let props = schema.resolve(&attrs(&[("hidden", "false")]));
        assert_eq!(props.get("hidden"), Some(&PropValue::Boolean(false)));
    }

    #[test]
    fn unparseable_declared_value_is_dropped() {
        let schema = PropSchema::new().prop("count", PropKind::Integer);
        let props = schema.resolve(&attrs(&[("count", "many"), ("other", "x")]));
        assert!(props.get("count").is_none());
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn redeclaring_replaces() {
        let schema = PropSchema::new()
            .prop("count", PropKind::Integer)
            .text("count");
        assert_eq!(schema.decls().len(), 1);
        assert_eq!(schema.decls()[0].kind, PropKind::Text);
    }

    #[test]
    fn strict_schema_observes_only_declared() {
        let schema = PropSchema::new().text("greeting").strict();
        assert!(schema.observes("greeting"));
        assert!(!schema.observes("other"));
        assert!(PropSchema::new().observes("anything"));
        assert_eq!(schema.observed_attributes(), vec!["greeting"]);
    }

    #[test]
    fn strict_schema_drops_undeclared_props() {
        let attributes = vec![
            ("greeting".to_owned(), "hi".to_owned()),
            ("data-extra".to_owned(), "x".to_owned()),
        ];

        let strict = PropSchema::new().text("greeting").strict().resolve(&attributes);
        assert_eq!(strict.len(), 1);
        assert_eq!(strict.text("greeting"), Some("hi"));
        assert_eq!(strict.get("dataExtra"), None);

        let lenient = PropSchema::new().text("greeting").resolve(&attributes);
        assert_eq!(lenient.text("dataExtra"), Some("x"));
    }
}
