//! Section identities and the open-ended section configuration map.

use std::{fmt, str::FromStr};

use rhai::{Dynamic, serde::to_dynamic};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Error;

/// The section kinds the builder knows how to generate code for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// Full-bleed hero banner with heading, subtitle and call to action.
    Hero,
    /// Grid of collection cards.
    Collections,
    /// Site footer with link columns and social icons.
    Footer,
}

impl SectionKind {
    /// Every kind, in sidebar order.
    pub const ALL: [Self; 3] = [Self::Hero, Self::Collections, Self::Footer];

    /// Canonical section identifier used for storage (`HeroSection`, ...).
    pub fn section_id(self) -> &'static str {
        match self {
            Self::Hero => "HeroSection",
            Self::Collections => "CollectionsSection",
            Self::Footer => "FooterSection",
        }
    }

    /// Human-readable name shown to operators.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Hero => "Hero Section",
            Self::Collections => "Collections",
            Self::Footer => "Footer",
        }
    }

    /// Resolve the kind for a stored section identifier, if it is one of the canonical ids.
    pub fn from_section_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.section_id() == id)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hero => "hero",
            Self::Collections => "collections",
            Self::Footer => "footer",
        };
        f.write_str(name)
    }
}

impl FromStr for SectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hero" | "herosection" => Ok(Self::Hero),
            "collections" | "collection" | "collectionssection" => Ok(Self::Collections),
            "footer" | "footersection" => Ok(Self::Footer),
            other => Err(format!(
                "unknown section kind '{}' (expected hero, collections or footer)",
                other
            )),
        }
    }
}

/// Tunable parameters of one page section.
///
/// No schema is enforced: each section kind reads the keys it understands and falls back to a
/// default for anything missing or of the wrong shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionConfig(Map<String, Value>);

impl SectionConfig {
    /// An empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::Config {
                message: format!("expected a JSON object, got {}", json_type(&other)),
            }),
        }
    }

    /// Parse a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(text).map_err(|e| Error::Config {
            message: e.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Raw access to a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set one field, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Remove one field.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// String value at `key`, or `default` when missing or not a string.
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.0.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// Integer value at `key` (floats truncate), or `default`.
    pub fn i64_or(&self, key: &str, default: i64) -> i64 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(default),
            _ => default,
        }
    }

    /// Array value at `key`, or an empty slice.
    pub fn array(&self, key: &str) -> &[Value] {
        self.0
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Nested object at `key`, if present.
    pub fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.0.get(key).and_then(Value::as_object)
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the config has no keys at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate top-level entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrow the underlying JSON map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert to a script value (an object map) for binding into a scope.
    pub fn to_dynamic(&self) -> Result<Dynamic, Error> {
        to_dynamic(&self.0).map_err(|e| Error::Config {
            message: e.to_string(),
        })
    }
}

impl From<Map<String, Value>> for SectionConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Short JSON type label for diagnostics.
fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
