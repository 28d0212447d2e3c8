use crate::error::{CmsError, CmsResult};
use crate::schema::types::{ContentEntry, ContentModel, FieldDefinition};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::Arc;

const GZIP: &str = "gzip";

/// Encodes field values before they are stored and decodes them after they
/// are read back.
#[async_trait]
pub trait StorageTransformPlugin: Send + Sync {
    fn field_type(&self) -> &str;

    async fn to_storage(
        &self,
        field: &FieldDefinition,
        value: Value,
        transforms: &StorageTransformRegistry,
    ) -> CmsResult<Value>;

    async fn from_storage(
        &self,
        field: &FieldDefinition,
        value: Value,
        transforms: &StorageTransformRegistry,
    ) -> CmsResult<Value>;
}

/// At most one transform per field type. Fields without a transform are
/// stored as-is.
#[derive(Clone, Default)]
pub struct StorageTransformRegistry {
    transforms: HashMap<String, Arc<dyn StorageTransformPlugin>>,
}

impl StorageTransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in rich-text and object transforms.
    pub fn with_builtin_transforms() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RichTextCompression));
        registry.register(Arc::new(ObjectValuesTransform));
        registry
    }

    /// Registers a transform. Returns false, keeping the existing one, when
    /// the field type already has a transform.
    pub fn register(&mut self, transform: Arc<dyn StorageTransformPlugin>) -> bool {
        let field_type = transform.field_type().to_string();
        if self.transforms.contains_key(&field_type) {
            crate::log_schema_warn!(
                "Storage transform for field type \"{}\" is already defined. There cannot be more than one transform.",
                field_type
            );
            return false;
        }
        self.transforms.insert(field_type, transform);
        true
    }

    pub fn contains(&self, field_type: &str) -> bool {
        self.transforms.contains_key(field_type)
    }

    pub async fn to_storage(&self, field: &FieldDefinition, value: Value) -> CmsResult<Value> {
        match self.transforms.get(&field.field_type) {
            Some(transform) => transform.to_storage(field, value, self).await,
            None => Ok(value),
        }
    }

    pub async fn from_storage(&self, field: &FieldDefinition, value: Value) -> CmsResult<Value> {
        match self.transforms.get(&field.field_type) {
            Some(transform) => transform.from_storage(field, value, self).await,
            None => Ok(value),
        }
    }

    /// Encodes every value of `entry` that belongs to a field of `model`.
    pub async fn entry_to_storage(
        &self,
        model: &ContentModel,
        entry: ContentEntry,
    ) -> CmsResult<ContentEntry> {
        let values = self.values_to_storage(&model.fields, entry.values).await?;
        Ok(ContentEntry { values, ..entry })
    }

    /// Decodes every value of `entry` that belongs to a field of `model`.
    pub async fn entry_from_storage(
        &self,
        model: &ContentModel,
        entry: ContentEntry,
    ) -> CmsResult<ContentEntry> {
        let values = self.values_from_storage(&model.fields, entry.values).await?;
        Ok(ContentEntry { values, ..entry })
    }

    async fn values_to_storage(
        &self,
        fields: &[FieldDefinition],
        mut values: Map<String, Value>,
    ) -> CmsResult<Map<String, Value>> {
        for field in fields {
            if let Some(value) = values.remove(&field.field_id) {
                let stored = self.to_storage(field, value).await?;
                values.insert(field.field_id.clone(), stored);
            }
        }
        Ok(values)
    }

    async fn values_from_storage(
        &self,
        fields: &[FieldDefinition],
        mut values: Map<String, Value>,
    ) -> CmsResult<Map<String, Value>> {
        for field in fields {
            if let Some(value) = values.remove(&field.field_id) {
                let decoded = self.from_storage(field, value).await?;
                values.insert(field.field_id.clone(), decoded);
            }
        }
        Ok(values)
    }
}

/// Stores rich-text documents gzip-compressed and base64-encoded as
/// `{ "compression": "gzip", "value": "<base64>" }`.
///
/// Decoding passes values that are not in the compressed shape through
/// unchanged, so an already decoded value decodes to itself.
pub struct RichTextCompression;

impl RichTextCompression {
    fn compress(value: &Value) -> CmsResult<Value> {
        let bytes = serde_json::to_vec(value)?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&bytes)?;
        let compressed = encoder.finish()?;
        Ok(json!({ "compression": GZIP, "value": STANDARD.encode(compressed) }))
    }

    fn decompress(field: &FieldDefinition, encoded: &str) -> CmsResult<Value> {
        let compressed = STANDARD.decode(encoded).map_err(|e| {
            CmsError::Transform(format!(
                "Field '{}' holds invalid base64: {}",
                field.field_id, e
            ))
        })?;
        let mut decoder = GzDecoder::new(&compressed[..]);
        let mut bytes = Vec::new();
        decoder.read_to_end(&mut bytes).map_err(|e| {
            CmsError::Transform(format!(
                "Field '{}' could not be decompressed: {}",
                field.field_id, e
            ))
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl StorageTransformPlugin for RichTextCompression {
    fn field_type(&self) -> &str {
        "rich-text"
    }

    async fn to_storage(
        &self,
        _field: &FieldDefinition,
        value: Value,
        _transforms: &StorageTransformRegistry,
    ) -> CmsResult<Value> {
        if value.is_null() {
            return Ok(value);
        }
        Self::compress(&value)
    }

    async fn from_storage(
        &self,
        field: &FieldDefinition,
        value: Value,
        _transforms: &StorageTransformRegistry,
    ) -> CmsResult<Value> {
        let Some(compression) = value.get("compression").and_then(Value::as_str) else {
            return Ok(value);
        };
        if compression != GZIP {
            return Err(CmsError::Transform(format!(
                "Field '{}' uses unsupported compression '{}'",
                field.field_id, compression
            )));
        }
        match value.get("value").and_then(Value::as_str) {
            Some(encoded) => Self::decompress(field, encoded),
            None => Err(CmsError::Transform(format!(
                "Field '{}' is missing its compressed value",
                field.field_id
            ))),
        }
    }
}

/// Applies the registered transforms to the nested fields of `object`
/// values, for single and repeatable objects alike.
pub struct ObjectValuesTransform;

impl ObjectValuesTransform {
    async fn each_object(
        field: &FieldDefinition,
        value: Value,
        transforms: &StorageTransformRegistry,
        to_storage: bool,
    ) -> CmsResult<Value> {
        let apply = |values: Map<String, Value>| async move {
            if to_storage {
                transforms.values_to_storage(&field.settings.fields, values).await
            } else {
                transforms.values_from_storage(&field.settings.fields, values).await
            }
        };
        match value {
            Value::Object(values) => Ok(Value::Object(apply(values).await?)),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(values) => out.push(Value::Object(apply(values).await?)),
                        other => out.push(other),
                    }
                }
                Ok(Value::Array(out))
            }
            other => Ok(other),
        }
    }
}

#[async_trait]
impl StorageTransformPlugin for ObjectValuesTransform {
    fn field_type(&self) -> &str {
        "object"
    }

    async fn to_storage(
        &self,
        field: &FieldDefinition,
        value: Value,
        transforms: &StorageTransformRegistry,
    ) -> CmsResult<Value> {
        Self::each_object(field, value, transforms, true).await
    }

    async fn from_storage(
        &self,
        field: &FieldDefinition,
        value: Value,
        transforms: &StorageTransformRegistry,
    ) -> CmsResult<Value> {
        Self::each_object(field, value, transforms, false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich_text_field() -> FieldDefinition {
        FieldDefinition::new("f1", "body", "rich-text")
    }

    #[tokio::test]
    async fn rich_text_is_compressed_and_restored() {
        let registry = StorageTransformRegistry::with_builtin_transforms();
        let field = rich_text_field();
        let document = json!([{ "type": "paragraph", "data": { "text": "Hello" } }]);

        let stored = registry.to_storage(&field, document.clone()).await.unwrap();
        assert_eq!(stored["compression"], "gzip");
        assert!(stored["value"].is_string());

        let restored = registry.from_storage(&field, stored).await.unwrap();
        assert_eq!(restored, document);
    }

    #[tokio::test]
    async fn decoding_plain_values_is_identity() {
        let registry = StorageTransformRegistry::with_builtin_transforms();
        let field = rich_text_field();
        let plain = json!({ "blocks": [] });
        assert_eq!(registry.from_storage(&field, plain.clone()).await.unwrap(), plain);
    }

    #[tokio::test]
    async fn corrupt_payload_is_a_transform_error() {
        let registry = StorageTransformRegistry::with_builtin_transforms();
        let field = rich_text_field();
        let corrupt = json!({ "compression": "gzip", "value": "not base64!" });
        assert!(matches!(
            registry.from_storage(&field, corrupt).await,
            Err(CmsError::Transform(_))
        ));
    }

    #[tokio::test]
    async fn object_transform_reaches_nested_fields() {
        let registry = StorageTransformRegistry::with_builtin_transforms();
        let field = FieldDefinition::new("f1", "sections", "object")
            .with_multiple_values(true)
            .with_fields(vec![
                FieldDefinition::new("n1", "heading", "text"),
                rich_text_field(),
            ]);
        let value = json!([{ "heading": "Intro", "body": { "blocks": [1, 2] } }]);

        let stored = registry.to_storage(&field, value.clone()).await.unwrap();
        assert_eq!(stored[0]["heading"], "Intro");
        assert_eq!(stored[0]["body"]["compression"], "gzip");

        let restored = registry.from_storage(&field, stored).await.unwrap();
        assert_eq!(restored, value);
    }

    #[test]
    fn duplicate_transform_is_ignored() {
        let mut registry = StorageTransformRegistry::with_builtin_transforms();
        assert!(!registry.register(Arc::new(RichTextCompression)));
        assert!(registry.contains("rich-text"));
    }
}
