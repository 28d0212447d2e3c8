use crate::error::CmsResult;
use crate::graphql::resolvers::{CustomResolver, FieldResolveParams, ResolverDef};
use crate::plugins::{graphql_type, Endpoint, FieldDefs, FieldProjection, FieldTypePlugin, ResolverContext};
use crate::schema::types::FieldDefinition;
use futures::FutureExt;
use serde_json::{json, Value};
use std::sync::Arc;

const REF_TYPE_DEFS: &str = "type RefField {\n    modelId: String\n    entryId: ID\n}";
const REF_INPUT_DEFS: &str = "input RefFieldInput {\n    modelId: String!\n    entryId: ID!\n}";

/// Reference to an entry of another model.
///
/// Stored values are either `{ modelId, entryId }` objects or bare entry IDs;
/// the resolver always returns the object form.
pub struct RefField;

impl RefField {
    fn referenced_model(field: &FieldDefinition) -> Option<String> {
        field
            .settings
            .model_id
            .clone()
            .or_else(|| field.settings.models.first().cloned())
    }
}

fn normalize_reference(model_id: Option<&str>, value: Value) -> Value {
    match value {
        Value::String(entry_id) => json!({ "modelId": model_id, "entryId": entry_id }),
        other => other,
    }
}

impl FieldTypePlugin for RefField {
    fn field_type(&self) -> &str {
        "ref"
    }

    fn shared_type_defs(&self, endpoint: Endpoint) -> Option<String> {
        match endpoint {
            Endpoint::Read => Some(REF_TYPE_DEFS.to_string()),
            Endpoint::Manage => Some(format!("{}\n\n{}", REF_TYPE_DEFS, REF_INPUT_DEFS)),
        }
    }

    fn create_type_field(&self, projection: &FieldProjection<'_>) -> Option<FieldDefs> {
        let field = projection.field;
        Some(format!("{}: {}", field.field_id, graphql_type(field, "RefField")).into())
    }

    fn create_input_field(&self, projection: &FieldProjection<'_>) -> Option<FieldDefs> {
        if projection.endpoint != Endpoint::Manage {
            return None;
        }
        let field = projection.field;
        Some(format!("{}: {}", field.field_id, graphql_type(field, "RefFieldInput")).into())
    }

    fn create_resolver(&self, ctx: &ResolverContext<'_>) -> Option<ResolverDef> {
        let model_id = Self::referenced_model(ctx.field);
        let resolver: CustomResolver = Arc::new(move |params: FieldResolveParams| {
            resolve_reference(model_id.clone(), params).boxed()
        });
        Some(ResolverDef::new(resolver))
    }
}

async fn resolve_reference(model_id: Option<String>, params: FieldResolveParams) -> CmsResult<Value> {
    let value = params
        .parent
        .get(&params.field.field_id)
        .cloned()
        .unwrap_or(Value::Null);
    Ok(match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| normalize_reference(model_id.as_deref(), item))
                .collect(),
        ),
        other => normalize_reference(model_id.as_deref(), other),
    })
}
