//! Built-in field types.

pub mod object;
pub mod reference;
pub mod rich_text;
pub mod scalar;

pub use object::{nested_type_name, ObjectField};
pub use reference::RefField;
pub use rich_text::RichTextField;
pub use scalar::ScalarField;

use super::FieldTypePlugin;
use std::sync::Arc;

pub fn builtin_field_types() -> Vec<Arc<dyn FieldTypePlugin>> {
    vec![
        Arc::new(scalar::text()),
        Arc::new(scalar::long_text()),
        Arc::new(scalar::number()),
        Arc::new(scalar::boolean()),
        Arc::new(scalar::datetime()),
        Arc::new(RefField),
        Arc::new(ObjectField),
        Arc::new(RichTextField),
    ]
}
