use contentfold::graphql::projector::DEFAULT_MAX_NESTING_DEPTH;
use contentfold::plugins::{Endpoint, FieldDefs, FieldProjection, FieldTypePlugin};
use contentfold::{ContentModel, FieldDefinition, FieldTypeRegistry, SchemaProjector};
use std::sync::Arc;

fn registry() -> FieldTypeRegistry {
    FieldTypeRegistry::with_builtin_field_types()
}

fn projector() -> SchemaProjector {
    SchemaProjector::new(Arc::new(registry()))
}

fn product() -> ContentModel {
    ContentModel::new("product", "Product").with_fields(vec![
        FieldDefinition::new("f1", "name", "text"),
        FieldDefinition::new("f2", "price", "number"),
        FieldDefinition::new("f3", "variants", "object")
            .with_multiple_values(true)
            .with_fields(vec![
                FieldDefinition::new("v1", "sku", "text"),
                FieldDefinition::new("v2", "dimensions", "object").with_fields(vec![
                    FieldDefinition::new("d1", "width", "number"),
                    FieldDefinition::new("d2", "height", "number"),
                ]),
            ]),
        FieldDefinition::new("f4", "category", "ref").with_model_id("category"),
        FieldDefinition::new("f5", "barcode", "barcode-scanner"),
    ])
}

/// Object field nested `levels` deep, each level holding a text field and
/// the next level.
fn nested(levels: usize) -> FieldDefinition {
    let mut field = FieldDefinition::new(&format!("l{}", levels), &format!("level{}", levels), "object")
        .with_fields(vec![FieldDefinition::new(&format!("t{}", levels), "label", "text")]);
    if levels > 1 {
        field.settings.fields.push(nested(levels - 1));
    }
    field
}

#[test]
fn nested_objects_become_named_types() {
    let sdl = projector().render_model(&product(), Endpoint::Read);

    assert!(sdl.contains("variants: [Product_Variants]"));
    assert!(sdl.contains("type Product_Variants {\n    sku: String\n    dimensions: Product_Variants_Dimensions\n}"));
    assert!(sdl.contains("type Product_Variants_Dimensions {\n    width: Float\n    height: Float\n}"));
    assert!(sdl.contains("category: RefField"));
}

#[test]
fn manage_endpoint_adds_nested_inputs() {
    let sdl = projector().render_model(&product(), Endpoint::Manage);

    assert!(sdl.contains("input ProductInput {"));
    assert!(sdl.contains("variants: [Product_VariantsInput]"));
    assert!(sdl.contains("input Product_Variants_DimensionsInput {"));
    assert!(sdl.contains("category: RefFieldInput"));
    assert!(sdl.contains("updateProduct(id: ID!, data: ProductInput!): ProductResponse"));
}

#[test]
fn unregistered_field_types_are_left_out_everywhere() {
    for endpoint in [Endpoint::Read, Endpoint::Manage] {
        let sdl = projector().render_schema(&[product()], endpoint);
        assert!(!sdl.contains("barcode"), "{} schema mentions barcode", endpoint);
    }
}

#[test]
fn only_sortable_single_fields_are_sorters() {
    let sorters = projector().sorters(&product());
    assert_eq!(
        sorters,
        vec!["id_ASC", "id_DESC", "name_ASC", "name_DESC", "price_ASC", "price_DESC"]
    );
}

#[test]
fn nesting_beyond_the_bound_is_skipped() {
    let model = ContentModel::new("tree", "Tree").with_fields(vec![nested(4)]);
    let sdl = projector()
        .with_max_nesting_depth(2)
        .render_model(&model, Endpoint::Read);

    assert!(sdl.contains("type Tree_Level4 {"));
    assert!(sdl.contains("type Tree_Level4_Level3 {"));
    assert!(!sdl.contains("Tree_Level4_Level3_Level2"));
    assert!(sdl.contains("type Tree_Level4_Level3 {\n    label: String\n}"));
}

#[test]
fn deep_models_within_the_default_bound_render_fully() {
    let model = ContentModel::new("tree", "Tree").with_fields(vec![nested(DEFAULT_MAX_NESTING_DEPTH)]);
    let sdl = projector()
        .render_validated_schema(&[model], Endpoint::Manage)
        .expect("schema parses");
    assert!(sdl.contains("Level2_Level1 {"));
}

#[test]
fn every_projected_schema_parses() {
    let models = vec![
        product(),
        ContentModel::new("empty", "Empty"),
        ContentModel::new("article", "Article").with_fields(vec![
            FieldDefinition::new("a1", "title", "text"),
            FieldDefinition::new("a2", "body", "rich-text"),
            FieldDefinition::new("a3", "published", "datetime"),
            FieldDefinition::new("a4", "related", "ref")
                .with_model_id("article")
                .with_multiple_values(true),
        ]),
    ];
    for endpoint in [Endpoint::Read, Endpoint::Manage] {
        let sdl = projector()
            .render_validated_schema(&models, endpoint)
            .unwrap_or_else(|e| panic!("{} schema: {}", endpoint, e));
        assert_eq!(sdl.matches("type RefField {").count(), 1);
        assert!(sdl.contains("type Empty {\n    id: ID!\n}"));
    }
}

/// Field type that exists only on the read endpoint.
struct ComputedField;

impl FieldTypePlugin for ComputedField {
    fn field_type(&self) -> &str {
        "computed"
    }

    fn create_type_field(&self, projection: &FieldProjection<'_>) -> Option<FieldDefs> {
        if projection.endpoint != Endpoint::Read {
            return None;
        }
        Some(format!("{}: String", projection.field.field_id).into())
    }
}

#[test]
fn plugins_choose_their_endpoints() {
    let mut registry = registry();
    registry.register(Arc::new(ComputedField));
    let projector = SchemaProjector::new(Arc::new(registry));
    let model = ContentModel::new("page", "Page").with_fields(vec![
        FieldDefinition::new("p1", "slug", "computed"),
    ]);

    let read = projector.render_model(&model, Endpoint::Read);
    let manage = projector.render_model(&model, Endpoint::Manage);
    assert!(read.contains("slug: String"));
    assert!(!manage.contains("slug"));
    assert!(manage.contains("input PageInput {\n    _empty: String\n}"));
}
