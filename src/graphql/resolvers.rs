//! Per-field resolver creation.
//!
//! Every registered field of a model gets a wrapped resolver that decodes the
//! stored value with the storage transform registry, writes the decoded value
//! into a working copy of the entry, and only then hands over to the field
//! type's custom resolver when it has one. Resolvers are async and run
//! independently of their siblings.

use crate::context::CmsContext;
use super::projector::DEFAULT_MAX_NESTING_DEPTH;
use crate::error::{CmsError, CmsResult};
use crate::plugins::{Endpoint, FieldTypeRegistry, ResolverContext};
use crate::schema::types::{ContentEntry, ContentModel, FieldDefinition};
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub type ResolverFuture = BoxFuture<'static, CmsResult<Value>>;

/// Resolver stored in a [`ResolverMap`]. Receives its own working copy of the
/// entry, the field arguments and the request context.
pub type FieldResolver =
    Arc<dyn Fn(ContentEntry, Map<String, Value>, Arc<CmsContext>) -> ResolverFuture + Send + Sync>;

/// Type-specific resolver supplied by a field type plugin.
pub type CustomResolver = Arc<dyn Fn(FieldResolveParams) -> ResolverFuture + Send + Sync>;

/// Inputs of a [`CustomResolver`]. `entry` already holds the decoded value
/// of `field`; `parent` is the value map the field belongs to.
pub struct FieldResolveParams {
    pub entry: ContentEntry,
    pub parent: Map<String, Value>,
    pub args: Map<String, Value>,
    pub field: FieldDefinition,
    pub context: Arc<CmsContext>,
}

/// A plugin's resolver plus any resolvers for types it generated.
pub struct ResolverDef {
    pub resolver: CustomResolver,
    pub type_resolvers: ResolverMap,
}

impl ResolverDef {
    pub fn new(resolver: CustomResolver) -> Self {
        Self {
            resolver,
            type_resolvers: ResolverMap::default(),
        }
    }

    pub fn with_type_resolvers(mut self, type_resolvers: ResolverMap) -> Self {
        self.type_resolvers = type_resolvers;
        self
    }
}

/// Outcome of resolving every field of one entry.
#[derive(Debug, Default)]
pub struct ResolvedEntry {
    pub values: Map<String, Value>,
    pub errors: BTreeMap<String, CmsError>,
}

impl ResolvedEntry {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Resolvers grouped by GraphQL type name, then by field name.
#[derive(Clone, Default)]
pub struct ResolverMap {
    types: HashMap<String, HashMap<String, FieldResolver>>,
}

impl ResolverMap {
    pub fn insert(&mut self, type_name: &str, field_id: &str, resolver: FieldResolver) {
        self.types
            .entry(type_name.to_string())
            .or_default()
            .insert(field_id.to_string(), resolver);
    }

    pub fn get(&self, type_name: &str, field_id: &str) -> Option<&FieldResolver> {
        self.types.get(type_name).and_then(|fields| fields.get(field_id))
    }

    pub fn contains_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Field names with a resolver on `type_name`, sorted.
    pub fn field_names(&self, type_name: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .types
            .get(type_name)
            .map(|fields| fields.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.keys().cloned().collect();
        names.sort();
        names
    }

    /// Merges `other` into this map; resolvers from `other` win on conflict.
    pub fn merge(&mut self, other: ResolverMap) {
        for (type_name, fields) in other.types {
            self.types.entry(type_name).or_default().extend(fields);
        }
    }

    /// Resolves one field, or returns `None` when the type has no resolver
    /// for it.
    pub async fn resolve_field(
        &self,
        type_name: &str,
        field_id: &str,
        entry: &ContentEntry,
        args: &Map<String, Value>,
        context: &Arc<CmsContext>,
    ) -> Option<CmsResult<Value>> {
        let resolver = self.get(type_name, field_id)?;
        Some(resolver(entry.clone(), args.clone(), context.clone()).await)
    }

    /// Resolves every field of `type_name` concurrently. A failing field is
    /// reported in `errors` and does not affect its siblings.
    pub async fn resolve_entry(
        &self,
        type_name: &str,
        entry: &ContentEntry,
        args: &Map<String, Value>,
        context: &Arc<CmsContext>,
    ) -> ResolvedEntry {
        let Some(fields) = self.types.get(type_name) else {
            return ResolvedEntry::default();
        };

        let pending = fields.iter().map(|(field_id, resolver)| {
            let future = resolver(entry.clone(), args.clone(), context.clone());
            let field_id = field_id.clone();
            async move { (field_id, future.await) }
        });

        let mut resolved = ResolvedEntry::default();
        for (field_id, result) in join_all(pending).await {
            match result {
                Ok(value) => {
                    resolved.values.insert(field_id, value);
                }
                Err(error) => {
                    crate::log_resolver_warn!(
                        "Field '{}' of '{}' failed to resolve: {}",
                        field_id,
                        type_name,
                        error
                    );
                    resolved.errors.insert(field_id, error);
                }
            }
        }
        resolved
    }
}

/// Resolver returning the entry ID, used as the `id` extra field.
pub fn entry_id_resolver() -> FieldResolver {
    Arc::new(
        |entry: ContentEntry, _args: Map<String, Value>, _context: Arc<CmsContext>| {
            async move { Ok::<Value, CmsError>(Value::String(entry.id)) }.boxed()
        },
    )
}

/// Builds resolver maps for the fields of a model on one endpoint.
pub struct ResolverFactory {
    registry: Arc<FieldTypeRegistry>,
    endpoint: Endpoint,
    max_nesting_depth: usize,
}

impl ResolverFactory {
    pub fn new(registry: Arc<FieldTypeRegistry>, endpoint: Endpoint) -> Self {
        Self {
            registry,
            endpoint,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }

    /// Resolvers for a whole model, including the `id` field.
    pub fn create_model_resolvers(&self, model: &ContentModel) -> ResolverMap {
        let mut extra_fields = HashMap::new();
        extra_fields.insert("id".to_string(), entry_id_resolver());
        self.create_field_resolvers(model, &model.graphql_type_name(), &model.fields, extra_fields, 0)
    }

    /// Resolvers for `fields` on `graphql_type`, merged with any type
    /// resolvers the field plugins produce. Fields of unregistered types are
    /// skipped.
    pub fn create_field_resolvers(
        &self,
        model: &ContentModel,
        graphql_type: &str,
        fields: &[FieldDefinition],
        extra_fields: HashMap<String, FieldResolver>,
        depth: usize,
    ) -> ResolverMap {
        let mut map = ResolverMap::default();
        let mut type_resolvers = ResolverMap::default();

        for (field_id, resolver) in extra_fields {
            map.insert(graphql_type, &field_id, resolver);
        }

        for field in fields {
            let Some(plugin) = self.registry.get(&field.field_type) else {
                crate::log_resolver_debug!(
                    "No field type plugin for '{}', skipping resolver of '{}'",
                    field.field_type,
                    field.field_id
                );
                continue;
            };

            let custom = plugin.create_resolver(&ResolverContext {
                model,
                field,
                graphql_type,
                endpoint: self.endpoint,
                depth,
                factory: self,
            });

            let custom = custom.map(|def| {
                type_resolvers.merge(def.type_resolvers);
                def.resolver
            });

            map.insert(graphql_type, &field.field_id, wrap_field_resolver(field.clone(), custom));
        }

        map.merge(type_resolvers);
        map
    }
}

fn wrap_field_resolver(field: FieldDefinition, custom: Option<CustomResolver>) -> FieldResolver {
    let field = Arc::new(field);
    Arc::new(
        move |entry: ContentEntry, args: Map<String, Value>, context: Arc<CmsContext>| {
            resolve_wrapped(field.clone(), custom.clone(), entry, args, context).boxed()
        },
    )
}

async fn resolve_wrapped(
    field: Arc<FieldDefinition>,
    custom: Option<CustomResolver>,
    mut entry: ContentEntry,
    args: Map<String, Value>,
    context: Arc<CmsContext>,
) -> CmsResult<Value> {
    let raw = entry.value(&field.field_id);
    let decoded = context.transforms().from_storage(&field, raw).await?;
    entry.values.insert(field.field_id.clone(), decoded.clone());

    match custom {
        None => Ok(decoded),
        Some(resolver) => {
            let parent = entry.values.clone();
            resolver(FieldResolveParams {
                entry,
                parent,
                args,
                field: (*field).clone(),
                context,
            })
            .await
        }
    }
}
