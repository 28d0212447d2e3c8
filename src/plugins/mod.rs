//! Field type plugins.
//!
//! A field type plugin translates one field `type` (text, object, ref, ...)
//! into GraphQL SDL fragments and, optionally, a custom resolver. Plugins are
//! collected in a [`FieldTypeRegistry`] that is built once at start-up and
//! shared read-only afterwards.
//!
//! Storage transforms (value encoding at rest) live in a separate
//! [`StorageTransformRegistry`] because they apply to every access path, not
//! only to GraphQL.

pub mod fields;
pub mod registry;
pub mod storage_transform;

pub use registry::FieldTypeRegistry;
pub use storage_transform::{StorageTransformPlugin, StorageTransformRegistry};

use crate::graphql::projector::SchemaProjector;
use crate::graphql::resolvers::{ResolverDef, ResolverFactory};
use crate::schema::types::{ContentModel, FieldDefinition};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema variant a projection is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Public, read-only query schema
    Read,
    /// Authoring schema with input types and mutations
    Manage,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Read => write!(f, "read"),
            Endpoint::Manage => write!(f, "manage"),
        }
    }
}

impl std::str::FromStr for Endpoint {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "read" => Ok(Endpoint::Read),
            "manage" => Ok(Endpoint::Manage),
            other => Err(format!("Unknown endpoint '{}'", other)),
        }
    }
}

/// What a plugin returns for a field: either a single SDL line, or the line
/// plus extra type definitions it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDefs {
    Inline(String),
    Composite { fields: String, type_defs: String },
}

impl From<String> for FieldDefs {
    fn from(fields: String) -> Self {
        FieldDefs::Inline(fields)
    }
}

/// Inputs available to a plugin while its field is being projected.
pub struct FieldProjection<'a> {
    pub model: &'a ContentModel,
    pub field: &'a FieldDefinition,
    /// Name of the GraphQL type that owns this field
    pub parent_type: &'a str,
    pub endpoint: Endpoint,
    /// Nesting level of `field`; top-level model fields are at depth 0
    pub depth: usize,
    pub projector: &'a SchemaProjector,
}

impl<'a> FieldProjection<'a> {
    /// Depth for the children of this field, or `None` when nesting one more
    /// level would exceed the projector's bound.
    pub fn nested_depth(&self) -> Option<usize> {
        let next = self.depth + 1;
        (next <= self.projector.max_nesting_depth()).then_some(next)
    }
}

/// Inputs available to a plugin while its resolver is being created.
pub struct ResolverContext<'a> {
    pub model: &'a ContentModel,
    pub field: &'a FieldDefinition,
    pub graphql_type: &'a str,
    pub endpoint: Endpoint,
    pub depth: usize,
    pub factory: &'a ResolverFactory,
}

/// Capability bundle for one field type.
///
/// Every hook receives the endpoint through its context, so a plugin can
/// expose different shapes on `read` and `manage`. Returning `None` from a
/// hook means the capability is absent for that endpoint and the field is
/// left out.
pub trait FieldTypePlugin: Send + Sync {
    /// The `type` key this plugin handles.
    fn field_type(&self) -> &str;

    fn is_sortable(&self) -> bool {
        false
    }

    /// Shared definitions (scalars, helper types) this field type needs in
    /// the schema document, rendered once per schema.
    fn shared_type_defs(&self, _endpoint: Endpoint) -> Option<String> {
        None
    }

    fn create_type_field(&self, projection: &FieldProjection<'_>) -> Option<FieldDefs>;

    fn create_input_field(&self, _projection: &FieldProjection<'_>) -> Option<FieldDefs> {
        None
    }

    fn create_resolver(&self, _ctx: &ResolverContext<'_>) -> Option<ResolverDef> {
        None
    }
}

/// Wraps `type_name` in a list when the field holds multiple values.
pub fn graphql_type(field: &FieldDefinition, type_name: &str) -> String {
    if field.multiple_values {
        format!("[{}]", type_name)
    } else {
        type_name.to_string()
    }
}
