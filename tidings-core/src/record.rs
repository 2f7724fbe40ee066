//! A loosely-typed action backed by a JSON object.

use crate::action::Action;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The field holding the kind of a [`Record`].
const TYPE_FIELD: &str = "type";

/// An action made of arbitrary fields plus a `"type"` field.
///
/// Use this when actions arrive as data (deserialized messages, scripted
/// input) rather than as a Rust enum. The kind is the `"type"` field when it
/// holds a non-empty string; anything else (missing, `null`, `false`, `0`,
/// `""`, a number, an object) makes the record malformed.
///
/// # Example
///
/// ```rust,ignore
/// let action = Record::new("select").with("id", 42);
/// assert_eq!(action.kind(), Some("select"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create a record of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(TYPE_FIELD.to_string(), Value::String(kind.into()));
        Self(fields)
    }

    /// Create a record with no `"type"` field.
    pub fn untyped() -> Self {
        Self(Map::new())
    }

    /// Add a field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Get a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrow all fields, including `"type"`.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for Record {
    type Error = Value;

    /// Accepts JSON objects; anything else is handed back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

impl Action for Record {
    fn kind(&self) -> Option<&str> {
        match self.0.get(TYPE_FIELD) {
            Some(Value::String(kind)) if !kind.is_empty() => Some(kind),
            _ => None,
        }
    }
}
