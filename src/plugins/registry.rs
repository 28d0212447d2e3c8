use super::{fields, Endpoint, FieldTypePlugin};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registry of field type plugins keyed by their `type` string.
///
/// Lookups never fail: a field whose type is not registered is simply
/// skipped by the projector and the resolver factory.
#[derive(Clone, Default)]
pub struct FieldTypeRegistry {
    plugins: BTreeMap<String, Arc<dyn FieldTypePlugin>>,
}

impl FieldTypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in field type.
    pub fn with_builtin_field_types() -> Self {
        let mut registry = Self::new();
        for plugin in fields::builtin_field_types() {
            registry.register(plugin);
        }
        registry
    }

    /// Registers a plugin, replacing and returning any plugin previously
    /// registered for the same type.
    pub fn register(&mut self, plugin: Arc<dyn FieldTypePlugin>) -> Option<Arc<dyn FieldTypePlugin>> {
        let field_type = plugin.field_type().to_string();
        let previous = self.plugins.insert(field_type.clone(), plugin);
        if previous.is_some() {
            crate::log_schema_debug!("Field type '{}' re-registered", field_type);
        }
        previous
    }

    pub fn get(&self, field_type: &str) -> Option<&Arc<dyn FieldTypePlugin>> {
        self.plugins.get(field_type)
    }

    pub fn contains(&self, field_type: &str) -> bool {
        self.plugins.contains_key(field_type)
    }

    /// Registered type keys in sorted order.
    pub fn field_types(&self) -> Vec<&str> {
        self.plugins.keys().map(String::as_str).collect()
    }

    /// Shared type definitions of every plugin, deduplicated.
    pub fn shared_type_defs(&self, endpoint: Endpoint) -> Vec<String> {
        let mut defs: Vec<String> = Vec::new();
        for plugin in self.plugins.values() {
            if let Some(def) = plugin.shared_type_defs(endpoint) {
                if !defs.contains(&def) {
                    defs.push(def);
                }
            }
        }
        defs
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
