use crate::plugins::{graphql_type, Endpoint, FieldDefs, FieldProjection, FieldTypePlugin};

/// Rich text document stored as JSON. Values are compressed at rest by
/// [`RichTextCompression`](crate::plugins::storage_transform::RichTextCompression).
pub struct RichTextField;

impl FieldTypePlugin for RichTextField {
    fn field_type(&self) -> &str {
        "rich-text"
    }

    fn shared_type_defs(&self, _endpoint: Endpoint) -> Option<String> {
        Some("scalar JSON".to_string())
    }

    fn create_type_field(&self, projection: &FieldProjection<'_>) -> Option<FieldDefs> {
        let field = projection.field;
        Some(format!("{}: {}", field.field_id, graphql_type(field, "JSON")).into())
    }

    fn create_input_field(&self, projection: &FieldProjection<'_>) -> Option<FieldDefs> {
        match projection.endpoint {
            Endpoint::Manage => self.create_type_field(projection),
            Endpoint::Read => None,
        }
    }
}
