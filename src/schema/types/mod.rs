pub mod entry;
pub mod errors;
pub mod field;
pub mod model;

pub use entry::ContentEntry;
pub use errors::SchemaError;
pub use field::{FieldDefinition, FieldLayout, FieldSettings, FieldValidation};
pub use model::{pascal_case, ContentModel};
