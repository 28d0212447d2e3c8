use super::types::{pascal_case, ContentModel, FieldDefinition, FieldLayout, SchemaError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static FIELD_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").expect("field ID pattern is valid")
});

static TYPE_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[_A-Za-z][_0-9A-Za-z]*$").expect("type name pattern is valid")
});

/// Validates a [`ContentModel`] before it is stored or projected.
///
/// Field types are not checked against a registry: a model may reference
/// types that are registered later, and such fields are skipped during
/// projection.
pub struct ContentModelValidator;

impl ContentModelValidator {
    pub fn validate(model: &ContentModel) -> Result<(), SchemaError> {
        if model.model_id.trim().is_empty() {
            return Err(SchemaError::InvalidModel(
                "Content model ID cannot be empty".to_string(),
            ));
        }
        let type_name = model.graphql_type_name();
        if !TYPE_NAME_PATTERN.is_match(&type_name) {
            return Err(SchemaError::InvalidModel(format!(
                "Model ID '{}' gives invalid GraphQL type name '{}'",
                model.model_id, type_name
            )));
        }

        let mut ids = HashSet::new();
        Self::validate_level(&model.model_id, &model.fields, model.layout.as_ref(), &mut ids)
    }

    /// Checks one field list. `ids` collects field IDs across all levels,
    /// since IDs are unique within the whole model.
    fn validate_level(
        owner: &str,
        fields: &[FieldDefinition],
        layout: Option<&FieldLayout>,
        ids: &mut HashSet<String>,
    ) -> Result<(), SchemaError> {
        let mut field_ids = HashSet::new();
        // pascal-cased suffix of each nested object type -> fieldId
        let mut nested_types: HashMap<String, &str> = HashMap::new();

        for field in fields {
            if field.id.trim().is_empty() {
                return Err(SchemaError::InvalidField(format!(
                    "A field of '{}' has no ID",
                    owner
                )));
            }
            if !ids.insert(field.id.clone()) {
                return Err(SchemaError::InvalidField(format!(
                    "Field ID '{}' is used more than once",
                    field.id
                )));
            }
            if !FIELD_ID_PATTERN.is_match(&field.field_id) {
                return Err(SchemaError::InvalidField(format!(
                    "Field '{}' of '{}' has invalid fieldId '{}'",
                    field.id, owner, field.field_id
                )));
            }
            if !field_ids.insert(field.field_id.as_str()) {
                return Err(SchemaError::InvalidField(format!(
                    "fieldId '{}' is used more than once in '{}'",
                    field.field_id, owner
                )));
            }

            if field.field_type == "object" {
                let suffix = pascal_case(&field.field_id);
                if let Some(other) = nested_types.insert(suffix.clone(), &field.field_id) {
                    return Err(SchemaError::InvalidField(format!(
                        "Object fields '{}' and '{}' of '{}' both generate type suffix '{}'",
                        other, field.field_id, owner, suffix
                    )));
                }
            }

            if !field.settings.fields.is_empty() {
                let nested_layout =
                    (!field.settings.layout.is_empty()).then_some(&field.settings.layout);
                Self::validate_level(&field.field_id, &field.settings.fields, nested_layout, ids)?;
            }
        }

        if let Some(layout) = layout {
            let known: HashSet<&str> = fields.iter().map(|f| f.id.as_str()).collect();
            for id in layout.iter().flatten() {
                if !known.contains(id.as_str()) {
                    return Err(SchemaError::InvalidLayout(format!(
                        "Layout of '{}' references unknown field '{}'",
                        owner, id
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(fields: Vec<FieldDefinition>) -> ContentModel {
        ContentModel::new("article", "Article").with_fields(fields)
    }

    #[test]
    fn accepts_unregistered_types() {
        let m = model(vec![FieldDefinition::new("a", "location", "geo-point")]);
        assert!(ContentModelValidator::validate(&m).is_ok());
    }

    #[test]
    fn rejects_duplicate_field_ids_per_level() {
        let m = model(vec![
            FieldDefinition::new("a", "title", "text"),
            FieldDefinition::new("b", "title", "text"),
        ]);
        assert!(matches!(
            ContentModelValidator::validate(&m),
            Err(SchemaError::InvalidField(_))
        ));
    }

    #[test]
    fn same_field_id_on_different_levels_is_fine() {
        let m = model(vec![
            FieldDefinition::new("a", "title", "text"),
            FieldDefinition::new("b", "seo", "object")
                .with_fields(vec![FieldDefinition::new("c", "title", "text")]),
        ]);
        assert!(ContentModelValidator::validate(&m).is_ok());
    }

    #[test]
    fn rejects_dangling_layout_reference() {
        let m = model(vec![FieldDefinition::new("a", "title", "text")])
            .with_layout(vec![vec!["a".to_string()], vec!["zzz".to_string()]]);
        assert!(matches!(
            ContentModelValidator::validate(&m),
            Err(SchemaError::InvalidLayout(_))
        ));
    }

    #[test]
    fn rejects_empty_model_id_and_bad_field_ids() {
        let empty = ContentModel::new("", "Nameless");
        assert!(ContentModelValidator::validate(&empty).is_err());

        let bad = model(vec![FieldDefinition::new("a", "9lives", "text")]);
        assert!(ContentModelValidator::validate(&bad).is_err());
    }

    #[test]
    fn rejects_model_ids_without_a_valid_type_name() {
        let numeric = ContentModel::new("1st-article", "First article");
        assert!(matches!(
            ContentModelValidator::validate(&numeric),
            Err(SchemaError::InvalidModel(_))
        ));

        let symbols = ContentModel::new("--", "Dashes");
        assert!(ContentModelValidator::validate(&symbols).is_err());

        let fine = ContentModel::new("first-article", "First article");
        assert!(ContentModelValidator::validate(&fine).is_ok());
    }

    #[test]
    fn rejects_object_siblings_sharing_a_nested_type() {
        let m = ContentModel::new("page", "Page").with_fields(vec![
            FieldDefinition::new("a", "seo_meta", "object")
                .with_fields(vec![FieldDefinition::new("a1", "title", "text")]),
            FieldDefinition::new("b", "seoMeta", "object")
                .with_fields(vec![FieldDefinition::new("b1", "description", "text")]),
        ]);
        assert!(matches!(
            ContentModelValidator::validate(&m),
            Err(SchemaError::InvalidField(msg)) if msg.contains("SeoMeta")
        ));
    }

    #[test]
    fn scalar_siblings_may_share_a_pascal_case_name() {
        let m = model(vec![
            FieldDefinition::new("a", "seo_meta", "text"),
            FieldDefinition::new("b", "seoMeta", "text"),
        ]);
        assert!(ContentModelValidator::validate(&m).is_ok());
    }
}
