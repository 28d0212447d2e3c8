use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored content entry. `values` is keyed by field ID and holds the
/// storage representation of each field, which may be encoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    pub id: String,
    pub model_id: String,
    #[serde(default)]
    pub values: Map<String, Value>,
}

impl ContentEntry {
    #[must_use]
    pub fn new(id: &str, model_id: &str) -> Self {
        Self {
            id: id.to_string(),
            model_id: model_id.to_string(),
            values: Map::new(),
        }
    }

    pub fn with_value(mut self, field_id: &str, value: Value) -> Self {
        self.values.insert(field_id.to_string(), value);
        self
    }

    /// Raw stored value of a field, `Null` when absent.
    pub fn value(&self, field_id: &str) -> Value {
        self.values.get(field_id).cloned().unwrap_or(Value::Null)
    }
}
