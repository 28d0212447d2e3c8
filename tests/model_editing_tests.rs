use contentfold::plugins::Endpoint;
use contentfold::schema::{LayoutPosition, SchemaError};
use contentfold::{ContentModel, ContentModelValidator, FieldDefinition, FieldTypeRegistry, SchemaProjector};
use std::sync::Arc;

fn registry() -> FieldTypeRegistry {
    FieldTypeRegistry::with_builtin_field_types()
}

#[test]
fn edited_model_stays_valid_and_projects() {
    let registry = registry();
    let mut model = ContentModel::new("event", "Event");

    let title = model
        .editor()
        .insert_field(FieldDefinition::new("", "title", "text"), LayoutPosition::new_row(0), &registry)
        .unwrap();
    let venue = model
        .editor()
        .insert_field(FieldDefinition::new("", "venue", "object"), LayoutPosition::at(0, 1), &registry)
        .unwrap();
    model
        .fields
        .iter_mut()
        .find(|f| f.id == venue)
        .unwrap()
        .nested_editor()
        .insert_field(FieldDefinition::new("", "city", "text"), LayoutPosition::new_row(0), &registry)
        .unwrap();

    assert_eq!(model.layout, Some(vec![vec![title.clone(), venue.clone()]]));
    ContentModelValidator::validate(&model).expect("edited model is valid");

    let sdl = SchemaProjector::new(Arc::new(registry))
        .render_validated_schema(&[model], Endpoint::Manage)
        .unwrap();
    assert!(sdl.contains("type Event_Venue {\n    city: String\n}"));
    assert!(sdl.contains("input Event_VenueInput {\n    city: String\n}"));
}

#[test]
fn deleting_fields_keeps_the_layout_consistent() {
    let registry = registry();
    let mut model = ContentModel::new("event", "Event").with_fields(vec![
        FieldDefinition::new("a", "title", "text"),
        FieldDefinition::new("b", "starts", "datetime"),
        FieldDefinition::new("c", "notes", "long-text"),
    ]);

    model.editor().move_field("c", LayoutPosition::at(0, 1)).unwrap();
    model.editor().delete_field("b").unwrap();

    assert_eq!(
        model.layout,
        Some(vec![vec!["a".to_string(), "c".to_string()]])
    );
    assert!(ContentModelValidator::validate(&model).is_ok());

    let err = model
        .editor()
        .insert_field(FieldDefinition::new("a", "other", "text"), LayoutPosition::new_row(1), &registry)
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidField(_)));
}

#[test]
fn models_load_from_json() {
    let json = r#"{
        "modelId": "author",
        "name": "Author",
        "fields": [
            { "id": "n", "fieldId": "name", "type": "text", "label": "Name" },
            { "id": "p", "fieldId": "photo", "type": "file" },
            {
                "id": "s",
                "fieldId": "social",
                "type": "object",
                "multipleValues": true,
                "settings": { "fields": [ { "id": "u", "fieldId": "url", "type": "text" } ] }
            }
        ],
        "layout": [["n"], ["p", "s"]]
    }"#;
    let model: ContentModel = serde_json::from_str(json).unwrap();
    ContentModelValidator::validate(&model).unwrap();

    let rows = model.fields_in_layout();
    assert_eq!(rows[1].iter().map(|f| f.field_id.as_str()).collect::<Vec<_>>(), vec!["photo", "social"]);

    let sdl = SchemaProjector::new(Arc::new(registry())).render_model(&model, Endpoint::Read);
    assert!(sdl.contains("social: [Author_Social]"));
    assert!(!sdl.contains("photo"));
}

#[test]
fn submitted_values_are_prepared_then_validated() {
    use contentfold::schema::{prepare_form_data, FieldValueTransformers, FieldValueValidators};
    use serde_json::json;

    let json = r#"{
        "modelId": "product",
        "name": "Product",
        "fields": [
            { "id": "n", "fieldId": "name", "type": "text", "validation": [{ "name": "required" }] },
            {
                "id": "p",
                "fieldId": "price",
                "type": "number",
                "validation": [{ "name": "required", "message": "Price is required." }]
            },
            {
                "id": "c",
                "fieldId": "code",
                "type": "text",
                "validation": [{ "name": "pattern", "settings": { "regex": "^[A-Z]{3}-\\d+$" } }]
            }
        ]
    }"#;
    let model: ContentModel = serde_json::from_str(json).unwrap();
    let transformers = FieldValueTransformers::with_builtin_transformers();
    let validators = FieldValueValidators::with_builtin_validators();

    let serde_json::Value::Object(submitted) = json!({ "name": "Lamp", "price": "", "code": "lmp-1" }) else {
        unreachable!()
    };
    let prepared = prepare_form_data(submitted, &model, &transformers);
    let errors = validators.validate_values(&prepared, &model).unwrap_err();
    let failed: Vec<(&str, &str)> = errors
        .iter()
        .map(|e| (e.field.as_str(), e.message.as_str()))
        .collect();
    assert_eq!(
        failed,
        vec![("price", "Price is required."), ("code", "Invalid value.")]
    );

    let serde_json::Value::Object(fixed) = json!({ "name": "Lamp", "price": "19.5", "code": "LMP-1" }) else {
        unreachable!()
    };
    let prepared = prepare_form_data(fixed, &model, &transformers);
    assert!(validators.validate_values(&prepared, &model).is_ok());
    assert_eq!(prepared["price"], json!(19.5));
}
