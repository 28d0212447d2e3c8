//! Content model to GraphQL SDL projection.
//!
//! The projector walks a model's field list and asks the field type registry
//! for each field's SDL fragment. Composite fields call back into the
//! projector for their own sub-fields, so nested object types are rendered by
//! the same code path as the top-level model. Recursion is bounded by
//! `max_nesting_depth`; fields beyond the bound are dropped with a warning.

use crate::error::CmsResult;
use crate::plugins::{Endpoint, FieldDefs, FieldProjection, FieldTypeRegistry};
use crate::schema::types::{ContentModel, FieldDefinition, SchemaError};
use async_graphql::parser::types::TypeSystemDefinition;
use std::collections::HashSet;
use std::sync::Arc;

pub const DEFAULT_MAX_NESTING_DEPTH: usize = 10;

const BASE_TYPE_DEFS: &str = r#"scalar JSON

type CmsError {
    code: String
    message: String
    data: JSON
}

type CmsListMeta {
    cursor: String
    hasMoreItems: Boolean
    totalCount: Int
}

type CmsDeleteResponse {
    data: Boolean
    error: CmsError
}

type Query {
    _empty: String
}"#;

const MUTATION_ROOT: &str = "type Mutation {\n    _empty: String\n}";

const EMPTY_PLACEHOLDER: &str = "_empty: String";

/// SDL produced for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedField {
    pub field_id: String,
    /// Field line(s) placed inside the owning type
    pub fields: String,
    /// Extra definitions the field depends on, placed at document level
    pub type_defs: Option<String>,
}

impl RenderedField {
    fn from_defs(field_id: &str, defs: FieldDefs) -> Self {
        match defs {
            FieldDefs::Inline(fields) => Self {
                field_id: field_id.to_string(),
                fields,
                type_defs: None,
            },
            FieldDefs::Composite { fields, type_defs } => Self {
                field_id: field_id.to_string(),
                fields,
                type_defs: (!type_defs.trim().is_empty()).then_some(type_defs),
            },
        }
    }
}

pub struct SchemaProjector {
    registry: Arc<FieldTypeRegistry>,
    max_nesting_depth: usize,
}

impl SchemaProjector {
    pub fn new(registry: Arc<FieldTypeRegistry>) -> Self {
        Self {
            registry,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }

    pub fn registry(&self) -> &Arc<FieldTypeRegistry> {
        &self.registry
    }

    fn projection<'a>(
        &'a self,
        model: &'a ContentModel,
        parent_type: &'a str,
        field: &'a FieldDefinition,
        endpoint: Endpoint,
        depth: usize,
    ) -> FieldProjection<'a> {
        FieldProjection {
            model,
            field,
            parent_type,
            endpoint,
            depth,
            projector: self,
        }
    }

    /// Output SDL for one field, or `None` when its type is not registered or
    /// the plugin has nothing to render on `endpoint`.
    pub fn render_field(
        &self,
        model: &ContentModel,
        parent_type: &str,
        field: &FieldDefinition,
        endpoint: Endpoint,
        depth: usize,
    ) -> Option<RenderedField> {
        let Some(plugin) = self.registry.get(&field.field_type) else {
            crate::log_schema_debug!(
                "Field '{}' has unregistered type '{}', leaving it out of '{}'",
                field.field_id,
                field.field_type,
                parent_type
            );
            return None;
        };
        let projection = self.projection(model, parent_type, field, endpoint, depth);
        plugin
            .create_type_field(&projection)
            .map(|defs| RenderedField::from_defs(&field.field_id, defs))
    }

    pub fn render_fields(
        &self,
        model: &ContentModel,
        parent_type: &str,
        fields: &[FieldDefinition],
        endpoint: Endpoint,
        depth: usize,
    ) -> Vec<RenderedField> {
        fields
            .iter()
            .filter_map(|field| self.render_field(model, parent_type, field, endpoint, depth))
            .collect()
    }

    /// Input SDL for `fields`. Inputs only exist on the manage endpoint.
    pub fn render_input_fields(
        &self,
        model: &ContentModel,
        parent_type: &str,
        fields: &[FieldDefinition],
        depth: usize,
    ) -> Vec<RenderedField> {
        fields
            .iter()
            .filter_map(|field| {
                let plugin = self.registry.get(&field.field_type)?;
                let projection =
                    self.projection(model, parent_type, field, Endpoint::Manage, depth);
                plugin
                    .create_input_field(&projection)
                    .map(|defs| RenderedField::from_defs(&field.field_id, defs))
            })
            .collect()
    }

    /// `type <type_name> { ... }` preceded by whatever nested definitions its
    /// fields need.
    pub fn render_object_type(
        &self,
        model: &ContentModel,
        type_name: &str,
        fields: &[FieldDefinition],
        endpoint: Endpoint,
        depth: usize,
    ) -> String {
        let rendered = self.render_fields(model, type_name, fields, endpoint, depth);
        assemble("type", type_name, &[], &rendered)
    }

    /// `input <type_name>Input { ... }` preceded by nested input definitions.
    pub fn render_input_type(
        &self,
        model: &ContentModel,
        type_name: &str,
        fields: &[FieldDefinition],
        depth: usize,
    ) -> String {
        let rendered = self.render_input_fields(model, type_name, fields, depth);
        assemble("input", &format!("{}Input", type_name), &[], &rendered)
    }

    /// Sorter values for the list query: `id` plus every sortable,
    /// single-valued top-level field.
    pub fn sorters(&self, model: &ContentModel) -> Vec<String> {
        let mut sortable = vec!["id".to_string()];
        sortable.extend(
            model
                .fields
                .iter()
                .filter(|field| !field.multiple_values)
                .filter(|field| {
                    self.registry
                        .get(&field.field_type)
                        .map(|plugin| plugin.is_sortable())
                        .unwrap_or(false)
                })
                .map(|field| field.field_id.clone()),
        );
        sortable
            .into_iter()
            .flat_map(|field_id| [format!("{}_ASC", field_id), format!("{}_DESC", field_id)])
            .collect()
    }

    /// Full SDL for one model: its output type, input type on manage,
    /// response envelopes and the `Query`/`Mutation` extensions.
    ///
    /// [`crate::graphql::resolvers::ResolverFactory`] builds field resolvers
    /// only. The host serving the schema resolves the `get`/`list`/`create`/
    /// `update`/`delete` root fields against its entry storage.
    pub fn render_model(&self, model: &ContentModel, endpoint: Endpoint) -> String {
        let type_name = model.graphql_type_name();
        crate::log_schema_debug!("Rendering model '{}' for {} endpoint", model.model_id, endpoint);

        let rendered = self.render_fields(model, &type_name, &model.fields, endpoint, 0);
        let mut parts = vec![assemble("type", &type_name, &["id: ID!"], &rendered)];

        if endpoint == Endpoint::Manage {
            let inputs = self.render_input_fields(model, &type_name, &model.fields, 0);
            parts.push(assemble("input", &format!("{}Input", type_name), &[], &inputs));
        }

        parts.push(format!(
            "type {name}Response {{\n    data: {name}\n    error: CmsError\n}}",
            name = type_name
        ));
        parts.push(format!(
            "type {name}ListResponse {{\n    data: [{name}]\n    meta: CmsListMeta\n    error: CmsError\n}}",
            name = type_name
        ));
        parts.push(format!(
            "enum {}ListSorter {{\n{}\n}}",
            type_name,
            indent(&self.sorters(model).join("\n"))
        ));

        parts.push(format!(
            "extend type Query {{\n    get{name}(id: ID!): {name}Response\n    list{name}s(where: JSON, sort: [{name}ListSorter], limit: Int, after: String): {name}ListResponse\n}}",
            name = type_name
        ));

        if endpoint == Endpoint::Manage {
            parts.push(format!(
                "extend type Mutation {{\n    create{name}(data: {name}Input!): {name}Response\n    update{name}(id: ID!, data: {name}Input!): {name}Response\n    delete{name}(id: ID!): CmsDeleteResponse\n}}",
                name = type_name
            ));
        }

        parts.join("\n\n")
    }

    /// Complete SDL document for `models` on `endpoint`.
    pub fn render_schema(&self, models: &[ContentModel], endpoint: Endpoint) -> String {
        let mut parts = vec![BASE_TYPE_DEFS.to_string()];
        if endpoint == Endpoint::Manage {
            parts.push(MUTATION_ROOT.to_string());
        }

        for def in self.registry.shared_type_defs(endpoint) {
            let redundant = def
                .lines()
                .all(|line| line.trim().is_empty() || BASE_TYPE_DEFS.lines().any(|b| b == line));
            if !redundant {
                parts.push(def);
            }
        }

        for model in models {
            parts.push(self.render_model(model, endpoint));
        }
        parts.join("\n\n")
    }

    /// Renders and checks that the result parses as an SDL document.
    pub fn render_validated_schema(
        &self,
        models: &[ContentModel],
        endpoint: Endpoint,
    ) -> CmsResult<String> {
        let sdl = self.render_schema(models, endpoint);
        validate_sdl(&sdl)?;
        Ok(sdl)
    }
}

/// Parses `sdl` with the GraphQL SDL parser and rejects type names that
/// are defined more than once (`extend type` aside).
pub fn validate_sdl(sdl: &str) -> CmsResult<()> {
    let document = async_graphql::parser::parse_schema(sdl).map_err(|e| {
        SchemaError::InvalidModel(format!("Generated schema does not parse: {}", e))
    })?;

    let mut defined = HashSet::new();
    for definition in &document.definitions {
        let TypeSystemDefinition::Type(def) = definition else {
            continue;
        };
        if def.node.extend {
            continue;
        }
        let name = def.node.name.node.as_str();
        if !defined.insert(name) {
            return Err(SchemaError::InvalidModel(format!(
                "Generated schema defines type '{}' more than once",
                name
            ))
            .into());
        }
    }
    Ok(())
}

fn indent(lines: &str) -> String {
    lines
        .lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn assemble(keyword: &str, name: &str, leading: &[&str], rendered: &[RenderedField]) -> String {
    let mut lines: Vec<String> = leading.iter().map(|l| l.to_string()).collect();
    lines.extend(rendered.iter().map(|r| r.fields.clone()));
    if lines.is_empty() {
        lines.push(EMPTY_PLACEHOLDER.to_string());
    }

    let mut out = String::new();
    for defs in rendered.iter().filter_map(|r| r.type_defs.as_deref()) {
        out.push_str(defs);
        out.push_str("\n\n");
    }
    out.push_str(&format!("{} {} {{\n{}\n}}", keyword, name, indent(&lines.join("\n"))));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector() -> SchemaProjector {
        SchemaProjector::new(Arc::new(FieldTypeRegistry::with_builtin_field_types()))
    }

    fn article() -> ContentModel {
        ContentModel::new("article", "Article").with_fields(vec![
            FieldDefinition::new("f1", "title", "text"),
            FieldDefinition::new("f2", "tags", "text").with_multiple_values(true),
            FieldDefinition::new("f3", "location", "geo-point"),
            FieldDefinition::new("f4", "body", "rich-text"),
        ])
    }

    #[test]
    fn renders_read_model() {
        let sdl = projector().render_model(&article(), Endpoint::Read);
        assert!(sdl.contains("type Article {\n    id: ID!\n    title: String\n    tags: [String]\n    body: JSON\n}"));
        assert!(sdl.contains("getArticle(id: ID!): ArticleResponse"));
        assert!(sdl.contains("listArticles("));
        assert!(!sdl.contains("input ArticleInput"));
        assert!(!sdl.contains("createArticle"));
    }

    #[test]
    fn unregistered_type_is_left_out() {
        let sdl = projector().render_model(&article(), Endpoint::Manage);
        assert!(!sdl.contains("location"));
        assert!(sdl.contains("input ArticleInput"));
        assert!(sdl.contains("deleteArticle(id: ID!): CmsDeleteResponse"));
    }

    #[test]
    fn sorters_cover_sortable_single_fields() {
        let sorters = projector().sorters(&article());
        assert_eq!(sorters, vec!["id_ASC", "id_DESC", "title_ASC", "title_DESC"]);
    }

    #[test]
    fn empty_nested_object_gets_placeholder() {
        let model = ContentModel::new("page", "Page").with_fields(vec![
            FieldDefinition::new("f1", "seo", "object"),
        ]);
        let sdl = projector().render_model(&model, Endpoint::Manage);
        assert!(sdl.contains("type Page_Seo {\n    _empty: String\n}"));
        assert!(sdl.contains("input Page_SeoInput {\n    _empty: String\n}"));
        assert!(validate_sdl(&projector().render_schema(&[model], Endpoint::Manage)).is_ok());
    }

    #[test]
    fn schema_parses_on_both_endpoints() {
        for endpoint in [Endpoint::Read, Endpoint::Manage] {
            let result = projector().render_validated_schema(&[article()], endpoint);
            assert!(result.is_ok(), "{:?}", result.err());
        }
    }

    #[test]
    fn broken_sdl_is_rejected() {
        assert!(validate_sdl("type {").is_err());
    }

    #[test]
    fn duplicate_type_definitions_are_rejected() {
        let model = ContentModel::new("page", "Page").with_fields(vec![
            FieldDefinition::new("f1", "seo_meta", "object")
                .with_fields(vec![FieldDefinition::new("f2", "title", "text")]),
            FieldDefinition::new("f3", "seoMeta", "object")
                .with_fields(vec![FieldDefinition::new("f4", "description", "text")]),
        ]);
        let result = projector().render_validated_schema(&[model], Endpoint::Read);
        assert!(matches!(result, Err(e) if e.to_string().contains("Page_SeoMeta")));

        let sdl = "type Query {\n    a: String\n}\n\nextend type Query {\n    b: String\n}";
        assert!(validate_sdl(sdl).is_ok());
    }
}
