use crate::error::{CmsError, CmsResult};
use crate::context::CmsContext;
use crate::graphql::resolvers::{CustomResolver, FieldResolveParams, ResolverDef, ResolverMap};
use crate::plugins::{graphql_type, Endpoint, FieldDefs, FieldProjection, FieldTypePlugin, ResolverContext};
use crate::schema::types::{pascal_case, ContentEntry, FieldDefinition};
use futures::FutureExt;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Composite field holding its own nested field list.
///
/// Projection renders a nested object type named `<Parent>_<FieldId>`
/// (and `<Parent>_<FieldId>Input` on the manage endpoint) by running the
/// projector again over `settings.fields`.
pub struct ObjectField;

/// GraphQL type name of the nested type generated for `field`.
pub fn nested_type_name(parent_type: &str, field: &FieldDefinition) -> String {
    format!("{}_{}", parent_type, pascal_case(&field.field_id))
}

impl FieldTypePlugin for ObjectField {
    fn field_type(&self) -> &str {
        "object"
    }

    fn create_type_field(&self, projection: &FieldProjection<'_>) -> Option<FieldDefs> {
        let field = projection.field;
        let Some(depth) = projection.nested_depth() else {
            crate::log_schema_warn!(
                "Skipping object field '{}' of model '{}': nesting exceeds {} levels",
                field.field_id,
                projection.model.model_id,
                projection.projector.max_nesting_depth()
            );
            return None;
        };

        let type_name = nested_type_name(projection.parent_type, field);
        let type_defs = projection.projector.render_object_type(
            projection.model,
            &type_name,
            &field.settings.fields,
            projection.endpoint,
            depth,
        );

        Some(FieldDefs::Composite {
            fields: format!("{}: {}", field.field_id, graphql_type(field, &type_name)),
            type_defs,
        })
    }

    fn create_input_field(&self, projection: &FieldProjection<'_>) -> Option<FieldDefs> {
        if projection.endpoint != Endpoint::Manage {
            return None;
        }
        let field = projection.field;
        let depth = projection.nested_depth()?;

        let type_name = nested_type_name(projection.parent_type, field);
        let type_defs = projection.projector.render_input_type(
            projection.model,
            &type_name,
            &field.settings.fields,
            depth,
        );

        Some(FieldDefs::Composite {
            fields: format!(
                "{}: {}",
                field.field_id,
                graphql_type(field, &format!("{}Input", type_name))
            ),
            type_defs,
        })
    }

    fn create_resolver(&self, ctx: &ResolverContext<'_>) -> Option<ResolverDef> {
        let depth = ctx.depth + 1;
        if depth > ctx.factory.max_nesting_depth() {
            return None;
        }

        let type_name = nested_type_name(ctx.graphql_type, ctx.field);
        let nested = Arc::new(ctx.factory.create_field_resolvers(
            ctx.model,
            &type_name,
            &ctx.field.settings.fields,
            Default::default(),
            depth,
        ));

        let type_resolvers = (*nested).clone();
        let resolver: CustomResolver = Arc::new(move |params: FieldResolveParams| {
            resolve_object_field(nested.clone(), type_name.clone(), params).boxed()
        });

        Some(ResolverDef::new(resolver).with_type_resolvers(type_resolvers))
    }
}

async fn resolve_object_field(
    nested: Arc<ResolverMap>,
    type_name: String,
    params: FieldResolveParams,
) -> CmsResult<Value> {
    let value = params
        .parent
        .get(&params.field.field_id)
        .cloned()
        .unwrap_or(Value::Null);
    let FieldResolveParams {
        entry,
        args,
        field,
        context,
        ..
    } = params;

    match value {
        Value::Null => Ok(Value::Null),
        Value::Object(values) => {
            resolve_object(&nested, &type_name, &entry, values, &args, &context).await
        }
        Value::Array(items) => {
            let mut resolved = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(values) => resolved.push(
                        resolve_object(&nested, &type_name, &entry, values, &args, &context).await?,
                    ),
                    Value::Null => resolved.push(Value::Null),
                    other => {
                        return Err(CmsError::Resolver(format!(
                            "Field '{}' expects objects, got {}",
                            field.field_id, other
                        )))
                    }
                }
            }
            Ok(Value::Array(resolved))
        }
        other => Err(CmsError::Resolver(format!(
            "Field '{}' expects an object, got {}",
            field.field_id, other
        ))),
    }
}

/// Runs the nested resolvers over one object value. The first failing
/// nested field fails the whole object.
async fn resolve_object(
    nested: &ResolverMap,
    type_name: &str,
    entry: &ContentEntry,
    values: Map<String, Value>,
    args: &Map<String, Value>,
    context: &Arc<CmsContext>,
) -> CmsResult<Value> {
    let working = ContentEntry {
        id: entry.id.clone(),
        model_id: entry.model_id.clone(),
        values,
    };
    let resolved = nested.resolve_entry(type_name, &working, args, context).await;
    if let Some((field_id, error)) = resolved.errors.into_iter().next() {
        return Err(CmsError::Resolver(format!(
            "Nested field '{}' failed: {}",
            field_id, error
        )));
    }
    Ok(Value::Object(resolved.values))
}
