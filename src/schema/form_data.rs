//! Normalization of submitted entry form values before they are saved.

use super::types::{ContentModel, FieldDefinition};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Converts a raw form value of one or more field types.
pub trait FieldValueTransformer: Send + Sync {
    fn field_types(&self) -> Vec<&str>;

    /// Transformed value, or `None` to leave the input as submitted.
    fn transform(&self, value: &Value, field: &FieldDefinition) -> Option<Value>;
}

#[derive(Clone, Default)]
pub struct FieldValueTransformers {
    transformers: HashMap<String, Arc<dyn FieldValueTransformer>>,
}

impl FieldValueTransformers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_transformers() -> Self {
        let mut transformers = Self::new();
        transformers.register(Arc::new(NumberTransformer));
        transformers.register(Arc::new(BooleanTransformer));
        transformers
    }

    /// Registers `transformer` for each of its field types that has no
    /// transformer yet.
    pub fn register(&mut self, transformer: Arc<dyn FieldValueTransformer>) {
        for field_type in transformer.field_types() {
            if self.transformers.contains_key(field_type) {
                crate::log_schema_warn!(
                    "Transformer for field type \"{}\" is already defined. There cannot be more than one transformer.",
                    field_type
                );
                continue;
            }
            self.transformers
                .insert(field_type.to_string(), transformer.clone());
        }
    }

    pub fn get(&self, field_type: &str) -> Option<&Arc<dyn FieldValueTransformer>> {
        self.transformers.get(field_type)
    }
}

/// Applies the matching transformer to every top-level field of `model`.
/// Keys without a transformer, and keys whose transformer returns `None`,
/// keep their submitted value.
pub fn prepare_form_data(
    input: Map<String, Value>,
    model: &ContentModel,
    transformers: &FieldValueTransformers,
) -> Map<String, Value> {
    let mut output = input;
    for field in &model.fields {
        let Some(transformer) = transformers.get(&field.field_type) else {
            continue;
        };
        let value = output.get(&field.field_id).cloned().unwrap_or(Value::Null);
        if let Some(transformed) = transformer.transform(&value, field) {
            output.insert(field.field_id.clone(), transformed);
        }
    }
    output
}

fn each_value(value: &Value, convert: impl Fn(&Value) -> Option<Value>) -> Option<Value> {
    match value {
        Value::Array(items) => Some(Value::Array(
            items
                .iter()
                .map(|item| convert(item).unwrap_or_else(|| item.clone()))
                .collect(),
        )),
        other => convert(other),
    }
}

/// Parses numeric strings. Empty strings become `null`.
pub struct NumberTransformer;

impl FieldValueTransformer for NumberTransformer {
    fn field_types(&self) -> Vec<&str> {
        vec!["number"]
    }

    fn transform(&self, value: &Value, _field: &FieldDefinition) -> Option<Value> {
        each_value(value, |item| match item {
            Value::String(s) if s.trim().is_empty() => Some(Value::Null),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),
            _ => None,
        })
    }
}

/// Parses `"true"` / `"false"`.
pub struct BooleanTransformer;

impl FieldValueTransformer for BooleanTransformer {
    fn field_types(&self) -> Vec<&str> {
        vec!["boolean"]
    }

    fn transform(&self, value: &Value, _field: &FieldDefinition) -> Option<Value> {
        each_value(value, |item| match item {
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        })
    }
}
