//! Field value validators, run over prepared form data before an entry is
//! saved. Each entry of a field's `validation` list names a validator.

use super::types::{ContentModel, FieldDefinition, FieldValidation};
use regex::RegexBuilder;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

static NULL: Value = Value::Null;

pub trait FieldValueValidator: Send + Sync {
    fn name(&self) -> &str;

    /// `Err` carries the default message, used when the field's validation
    /// entry has no `message` of its own.
    fn validate(&self, value: &Value, settings: &Map<String, Value>) -> Result<(), String>;
}

/// One failed validation. `field` is a path such as `seo.title` or
/// `variants[1].sku` for nested object fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValueError {
    pub field: String,
    pub validator: String,
    pub message: String,
}

impl fmt::Display for FieldValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Clone, Default)]
pub struct FieldValueValidators {
    validators: HashMap<String, Arc<dyn FieldValueValidator>>,
}

impl FieldValueValidators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_validators() -> Self {
        let mut validators = Self::new();
        validators.register(Arc::new(RequiredValidator));
        validators.register(Arc::new(PatternValidator));
        validators
    }

    /// First registration of a name wins.
    pub fn register(&mut self, validator: Arc<dyn FieldValueValidator>) {
        let name = validator.name().to_string();
        if self.validators.contains_key(&name) {
            crate::log_schema_warn!(
                "Validator \"{}\" is already defined. There cannot be more than one validator.",
                name
            );
            return;
        }
        self.validators.insert(name, validator);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn FieldValueValidator>> {
        self.validators.get(name)
    }

    /// Checks `values` against the validation lists of `model`'s fields,
    /// descending into object fields. Validators that are not registered
    /// are skipped with a warning.
    pub fn validate_values(
        &self,
        values: &Map<String, Value>,
        model: &ContentModel,
    ) -> Result<(), Vec<FieldValueError>> {
        let mut errors = Vec::new();
        self.validate_level(values, &model.fields, "", &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_level(
        &self,
        values: &Map<String, Value>,
        fields: &[FieldDefinition],
        prefix: &str,
        errors: &mut Vec<FieldValueError>,
    ) {
        for field in fields {
            let path = format!("{}{}", prefix, field.field_id);
            let value = values.get(&field.field_id).unwrap_or(&NULL);

            for validation in &field.validation {
                if let Err(message) = self.run(validation, value) {
                    errors.push(FieldValueError {
                        field: path.clone(),
                        validator: validation.name.clone(),
                        message,
                    });
                }
            }

            if field.settings.fields.is_empty() {
                continue;
            }
            match value {
                Value::Object(nested) => {
                    self.validate_level(nested, &field.settings.fields, &format!("{}.", path), errors)
                }
                Value::Array(items) => {
                    for (index, item) in items.iter().enumerate() {
                        if let Value::Object(nested) = item {
                            let prefix = format!("{}[{}].", path, index);
                            self.validate_level(nested, &field.settings.fields, &prefix, errors);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn run(&self, validation: &FieldValidation, value: &Value) -> Result<(), String> {
        let Some(validator) = self.get(&validation.name) else {
            crate::log_schema_warn!("No validator named \"{}\"; skipping", validation.name);
            return Ok(());
        };
        validator
            .validate(value, &validation.settings)
            .map_err(|default| validation.message.clone().unwrap_or(default))
    }
}

/// Rejects `null` and missing values.
pub struct RequiredValidator;

impl FieldValueValidator for RequiredValidator {
    fn name(&self) -> &str {
        "required"
    }

    fn validate(&self, value: &Value, _settings: &Map<String, Value>) -> Result<(), String> {
        if value.is_null() {
            return Err("Value is required.".to_string());
        }
        Ok(())
    }
}

/// Matches string values against `settings.regex` (with optional
/// `settings.flags`, where `i` means case-insensitive). Other values pass.
pub struct PatternValidator;

impl FieldValueValidator for PatternValidator {
    fn name(&self) -> &str {
        "pattern"
    }

    fn validate(&self, value: &Value, settings: &Map<String, Value>) -> Result<(), String> {
        let Some(source) = settings.get("regex").and_then(Value::as_str) else {
            return Err("Pattern validator has no regex.".to_string());
        };
        let case_insensitive = settings
            .get("flags")
            .and_then(Value::as_str)
            .is_some_and(|flags| flags.contains('i'));
        let pattern = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| format!("Invalid pattern: {}", e))?;

        let strings: Vec<&str> = match value {
            Value::String(s) => vec![s.as_str()],
            Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        if strings.iter().all(|s| pattern.is_match(s)) {
            Ok(())
        } else {
            Err("Invalid value.".to_string())
        }
    }
}
