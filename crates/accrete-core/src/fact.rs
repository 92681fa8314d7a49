//! Facts: typed objects asserted into working memory.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::value::Value;

/// Errors building a fact from external data.
#[derive(Debug, thiserror::Error)]
pub enum FactError {
    #[error("invalid fact JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fact JSON must be an object, found {0}")]
    NotAnObject(&'static str),
}

/// A typed object with ordered fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Fact {
    object_type: String,
    fields: IndexMap<String, Value>,
}

impl Fact {
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field assignment.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Iterate over `(name, value)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build a fact of `object_type` from a JSON object.
    ///
    /// Nested objects become facts typed `object`; integers that fit in `i64`
    /// stay integral, every other number becomes a float.
    pub fn from_json(object_type: impl Into<String>, json: &str) -> Result<Self, FactError> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(map) = parsed else {
            return Err(FactError::NotAnObject(json_kind(&parsed)));
        };
        Ok(Self::from_json_map(object_type.into(), map))
    }

    fn from_json_map(object_type: String, map: serde_json::Map<String, serde_json::Value>) -> Self {
        let fields = map
            .into_iter()
            .map(|(k, v)| (k, json_to_value(v)))
            .collect();
        Self {
            object_type,
            fields,
        }
    }
}

fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::Text(s),
        serde_json::Value::Array(items) => Value::List(items.into_iter().map(json_to_value).collect()),
        serde_json::Value::Object(map) => {
            Value::Fact(Arc::new(Fact::from_json_map("object".to_owned(), map)))
        }
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl Serialize for Fact {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("$type", &self.object_type)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.object_type)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, ")")
    }
}
