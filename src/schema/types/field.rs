use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Rows of field IDs describing how fields are arranged in the editor grid.
pub type FieldLayout = Vec<Vec<String>>;

/// A single validator attached to a field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValidation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Value>,
}

/// Type-specific settings of a field definition.
///
/// Composite `object` fields carry their own nested `fields` and `layout`,
/// reference fields carry the referenced model IDs. Any other key is kept
/// verbatim in `extra` so that plugins can read their own settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSettings {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layout: FieldLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Definition of one field inside a content model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Stable identifier used by the layout grid
    pub id: String,
    /// Name of the field as exposed in GraphQL and in entry values
    pub field_id: String,
    /// Field type key, resolved against the field type registry
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub multiple_values: bool,
    #[serde(default)]
    pub validation: Vec<FieldValidation>,
    #[serde(default)]
    pub settings: FieldSettings,
}

impl FieldDefinition {
    #[must_use]
    pub fn new(id: &str, field_id: &str, field_type: &str) -> Self {
        Self {
            id: id.to_string(),
            field_id: field_id.to_string(),
            field_type: field_type.to_string(),
            label: None,
            multiple_values: false,
            validation: Vec::new(),
            settings: FieldSettings::default(),
        }
    }

    pub fn with_multiple_values(mut self, multiple_values: bool) -> Self {
        self.multiple_values = multiple_values;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Sets the nested fields of a composite field. The nested layout
    /// defaults to one row per field.
    pub fn with_fields(mut self, fields: Vec<FieldDefinition>) -> Self {
        self.settings.layout = fields.iter().map(|f| vec![f.id.clone()]).collect();
        self.settings.fields = fields;
        self
    }

    pub fn with_model_id(mut self, model_id: &str) -> Self {
        self.settings.model_id = Some(model_id.to_string());
        self
    }

    pub fn with_validation(mut self, validation: FieldValidation) -> Self {
        self.validation.push(validation);
        self
    }
}
