// src/integrations/document_store/document.rs

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// A stored document: system fields plus the user attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "$id")]
    pub id: String,

    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "$updatedAt")]
    pub updated_at: DateTime<Utc>,

    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Document {
    /// Drop the remaining `$`-prefixed system fields from `data`
    pub fn strip_system_fields(mut self) -> Self {
        self.data.retain(|key, _| !key.starts_with('$'));
        self
    }

    /// Attribute lookup that also resolves the system fields
    pub fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "$id" => Some(Value::String(self.id.clone())),
            "$createdAt" => Some(Value::String(self.created_at.to_rfc3339())),
            "$updatedAt" => Some(Value::String(self.updated_at.to_rfc3339())),
            _ => self.data.get(name).cloned(),
        }
    }

    /// Decode the user attributes into an entity
    pub fn decode<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_value(Value::Object(self.data.clone())).map_err(AppError::Serialization)
    }
}

/// Serialize an entity into an attribute map
pub fn to_attributes<T: Serialize>(entity: &T) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Other(format!(
            "Expected an object for document attributes, got {}",
            other
        ))),
    }
}

/// Update precondition checked against the current stored document
#[derive(Debug, Clone, PartialEq)]
pub enum Precondition {
    /// The attribute must currently equal the value; `Null` means "absent"
    FieldEquals(String, Value),
}

impl Precondition {
    pub fn field_equals(attribute: &str, value: impl Into<Value>) -> Self {
        Precondition::FieldEquals(attribute.to_string(), value.into())
    }

    pub fn holds(&self, document: &Document) -> bool {
        match self {
            Precondition::FieldEquals(attribute, expected) => {
                let current = document.data.get(attribute).unwrap_or(&Value::Null);
                values_equal(current, expected)
            }
        }
    }
}

/// Equality with numbers compared by value (1 == 1.0)
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        _ => a == b,
    }
}
