use contentfold::plugins::Endpoint;
use contentfold::{
    CmsContext, CmsError, ContentEntry, ContentModel, FieldDefinition, FieldTypeRegistry,
    ResolverFactory, StorageTransformRegistry,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn model() -> ContentModel {
    ContentModel::new("article", "Article").with_fields(vec![
        FieldDefinition::new("f1", "title", "text"),
        FieldDefinition::new("f2", "body", "rich-text"),
        FieldDefinition::new("f3", "seo", "object").with_fields(vec![
            FieldDefinition::new("s1", "description", "long-text"),
            FieldDefinition::new("s2", "summary", "rich-text"),
        ]),
        FieldDefinition::new("f4", "author", "ref").with_model_id("author"),
        FieldDefinition::new("f5", "related", "ref")
            .with_model_id("article")
            .with_multiple_values(true),
        FieldDefinition::new("f6", "coordinates", "geo-point"),
    ])
}

fn context() -> Arc<CmsContext> {
    Arc::new(CmsContext::with_builtins("root", "en-US"))
}

fn factory() -> ResolverFactory {
    ResolverFactory::new(
        Arc::new(FieldTypeRegistry::with_builtin_field_types()),
        Endpoint::Read,
    )
}

fn paragraph(text: &str) -> Value {
    json!([{ "type": "paragraph", "data": { "text": text } }])
}

/// Entry as it sits in storage: every value passed through the transforms.
async fn stored_entry(model: &ContentModel, values: Value) -> ContentEntry {
    let Value::Object(values) = values else {
        panic!("entry values must be an object");
    };
    let entry = ContentEntry {
        id: "entry-1".to_string(),
        model_id: model.model_id.clone(),
        values,
    };
    StorageTransformRegistry::with_builtin_transforms()
        .entry_to_storage(model, entry)
        .await
        .expect("entry encodes")
}

#[tokio::test]
async fn resolvers_return_decoded_values() {
    let model = model();
    let entry = stored_entry(
        &model,
        json!({
            "title": "Hello",
            "body": paragraph("Body"),
            "seo": { "description": "Short", "summary": paragraph("Summary") },
        }),
    )
    .await;
    assert_eq!(entry.values["body"]["compression"], "gzip");
    assert_eq!(entry.values["seo"]["summary"]["compression"], "gzip");

    let resolvers = factory().create_model_resolvers(&model);
    let resolved = resolvers
        .resolve_entry("Article", &entry, &Map::new(), &context())
        .await;

    assert!(resolved.is_ok(), "{:?}", resolved.errors);
    assert_eq!(resolved.values["id"], "entry-1");
    assert_eq!(resolved.values["title"], "Hello");
    assert_eq!(resolved.values["body"], paragraph("Body"));
    assert_eq!(
        resolved.values["seo"],
        json!({ "description": "Short", "summary": paragraph("Summary") })
    );
}

#[tokio::test]
async fn unregistered_fields_get_no_resolver() {
    let resolvers = factory().create_model_resolvers(&model());
    let names = resolvers.field_names("Article");

    assert!(!names.contains(&"coordinates".to_string()));
    assert_eq!(
        names,
        vec!["author", "body", "id", "related", "seo", "title"]
    );
    assert_eq!(
        resolvers.field_names("Article_Seo"),
        vec!["description", "summary"]
    );
}

#[tokio::test]
async fn corrupt_value_fails_only_its_own_field() {
    let model = model();
    let mut entry = stored_entry(&model, json!({ "title": "Hello", "body": paragraph("Body") })).await;
    entry.values.insert(
        "body".to_string(),
        json!({ "compression": "gzip", "value": "bm90IGd6aXA=" }),
    );

    let resolved = factory()
        .create_model_resolvers(&model)
        .resolve_entry("Article", &entry, &Map::new(), &context())
        .await;

    assert!(matches!(resolved.errors.get("body"), Some(CmsError::Transform(_))));
    assert_eq!(resolved.errors.len(), 1);
    assert_eq!(resolved.values["title"], "Hello");
    assert_eq!(resolved.values["id"], "entry-1");
}

#[tokio::test]
async fn single_field_resolution() {
    let model = model();
    let entry = stored_entry(&model, json!({ "body": paragraph("Only") })).await;
    let resolvers = factory().create_model_resolvers(&model);

    let body = resolvers
        .resolve_field("Article", "body", &entry, &Map::new(), &context())
        .await
        .expect("body has a resolver")
        .expect("body resolves");
    assert_eq!(body, paragraph("Only"));

    let missing = resolvers
        .resolve_field("Article", "title", &entry, &Map::new(), &context())
        .await
        .expect("title has a resolver")
        .expect("title resolves");
    assert_eq!(missing, Value::Null);

    assert!(resolvers
        .resolve_field("Article", "coordinates", &entry, &Map::new(), &context())
        .await
        .is_none());
}

#[tokio::test]
async fn references_resolve_to_objects() {
    let model = model();
    let entry = stored_entry(
        &model,
        json!({
            "author": "author-7",
            "related": ["a-1", { "modelId": "article", "entryId": "a-2" }],
        }),
    )
    .await;

    let resolved = factory()
        .create_model_resolvers(&model)
        .resolve_entry("Article", &entry, &Map::new(), &context())
        .await;

    assert_eq!(
        resolved.values["author"],
        json!({ "modelId": "author", "entryId": "author-7" })
    );
    assert_eq!(
        resolved.values["related"],
        json!([
            { "modelId": "article", "entryId": "a-1" },
            { "modelId": "article", "entryId": "a-2" },
        ])
    );
}

#[tokio::test]
async fn repeatable_objects_resolve_each_item() {
    let model = ContentModel::new("page", "Page").with_fields(vec![
        FieldDefinition::new("p1", "blocks", "object")
            .with_multiple_values(true)
            .with_fields(vec![
                FieldDefinition::new("b1", "heading", "text"),
                FieldDefinition::new("b2", "content", "rich-text"),
            ]),
    ]);
    let entry = stored_entry(
        &model,
        json!({
            "blocks": [
                { "heading": "One", "content": paragraph("First") },
                null,
                { "heading": "Two" },
            ]
        }),
    )
    .await;

    let resolved = factory()
        .create_model_resolvers(&model)
        .resolve_entry("Page", &entry, &Map::new(), &context())
        .await;

    assert!(resolved.is_ok(), "{:?}", resolved.errors);
    assert_eq!(
        resolved.values["blocks"],
        json!([
            { "heading": "One", "content": paragraph("First") },
            null,
            { "heading": "Two", "content": null },
        ])
    );
}

#[tokio::test]
async fn object_with_scalar_value_is_an_error() {
    let model = model();
    let entry = ContentEntry::new("entry-1", "article")
        .with_value("title", json!("Hello"))
        .with_value("seo", json!("not an object"));

    let resolved = factory()
        .create_model_resolvers(&model)
        .resolve_entry("Article", &entry, &Map::new(), &context())
        .await;

    assert!(matches!(resolved.errors.get("seo"), Some(CmsError::Resolver(_))));
    assert_eq!(resolved.values["title"], "Hello");
}

#[tokio::test]
async fn nesting_bound_limits_type_resolvers() {
    let model = ContentModel::new("tree", "Tree").with_fields(vec![
        FieldDefinition::new("a", "outer", "object").with_fields(vec![
            FieldDefinition::new("b", "inner", "object")
                .with_fields(vec![FieldDefinition::new("c", "label", "text")]),
        ]),
    ]);

    let resolvers = factory()
        .with_max_nesting_depth(1)
        .create_model_resolvers(&model);

    assert!(resolvers.contains_type("Tree_Outer"));
    assert!(!resolvers.contains_type("Tree_Outer_Inner"));
}

#[test]
fn resolvers_and_projection_share_the_default_nesting_bound() {
    let registry = Arc::new(FieldTypeRegistry::with_builtin_field_types());
    let projector = contentfold::SchemaProjector::new(registry.clone());
    let factory = ResolverFactory::new(registry, Endpoint::Manage);
    assert_eq!(factory.max_nesting_depth(), projector.max_nesting_depth());
    assert_eq!(
        factory.max_nesting_depth(),
        contentfold::graphql::projector::DEFAULT_MAX_NESTING_DEPTH
    );
}
