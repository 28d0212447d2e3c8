//! Content models: types, validation, editing, form data preparation and
//! field value validators.

pub mod editor;
pub mod form_data;
pub mod types;
pub mod validator;
pub mod value_validation;

pub use editor::{default_layout, FieldEditor, LayoutPosition};
pub use form_data::{prepare_form_data, FieldValueTransformer, FieldValueTransformers};
pub use types::{
    ContentEntry, ContentModel, FieldDefinition, FieldLayout, FieldSettings, FieldValidation,
    SchemaError,
};
pub use validator::ContentModelValidator;
pub use value_validation::{FieldValueError, FieldValueValidator, FieldValueValidators};
