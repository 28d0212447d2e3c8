use serde::{Deserialize, Serialize};

use super::field::{FieldDefinition, FieldLayout};

/// A user-defined content schema: an ordered list of typed fields plus an
/// optional editor layout.
///
/// The model is the unit consumed by the schema projector. It is persisted
/// as a single JSON document; the field list keeps its declaration order,
/// which is also the order of the generated GraphQL fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModel {
    /// Unique model identifier, also the base of the GraphQL type name
    pub model_id: String,
    /// Human readable name
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<FieldLayout>,
}

impl ContentModel {
    #[must_use]
    pub fn new(model_id: &str, name: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            name: name.to_string(),
            fields: Vec::new(),
            layout: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldDefinition>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_layout(mut self, layout: FieldLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Finds a field by its layout ID.
    pub fn field_by_id(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Finds a field by its GraphQL field ID.
    pub fn field_by_field_id(&self, field_id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.field_id == field_id)
    }

    /// Name of the GraphQL object type generated for this model.
    pub fn graphql_type_name(&self) -> String {
        pascal_case(&self.model_id)
    }
}

/// Converts `some-model_id` into `SomeModelId`.
pub fn pascal_case(value: &str) -> String {
    value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_handles_separators() {
        assert_eq!(pascal_case("blog-post"), "BlogPost");
        assert_eq!(pascal_case("product_variant"), "ProductVariant");
        assert_eq!(pascal_case("author"), "Author");
        assert_eq!(pascal_case("seoSettings"), "SeoSettings");
    }

    #[test]
    fn model_round_trips_through_json() {
        let json = serde_json::json!({
            "modelId": "book",
            "name": "Book",
            "fields": [
                { "id": "f1", "fieldId": "title", "type": "text", "validation": [{ "name": "required" }] },
                { "id": "f2", "fieldId": "author", "type": "ref", "settings": { "models": ["author"] } }
            ],
            "layout": [["f1"], ["f2"]]
        });
        let model: ContentModel = serde_json::from_value(json).unwrap();
        assert_eq!(model.fields.len(), 2);
        assert_eq!(model.fields[0].validation[0].name, "required");
        assert_eq!(model.fields[1].settings.models, vec!["author".to_string()]);
        assert_eq!(model.graphql_type_name(), "Book");
        assert_eq!(model.field_by_field_id("author").unwrap().id, "f2");
    }

    #[test]
    fn unknown_settings_are_preserved() {
        let json = serde_json::json!({
            "id": "f1",
            "fieldId": "body",
            "type": "rich-text",
            "settings": { "toolbar": ["bold", "italic"] }
        });
        let field: FieldDefinition = serde_json::from_value(json).unwrap();
        assert!(field.settings.extra.contains_key("toolbar"));
        let back = serde_json::to_value(&field).unwrap();
        assert_eq!(back["settings"]["toolbar"][1], "italic");
    }
}
