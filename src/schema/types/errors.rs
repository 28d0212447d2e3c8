use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    NotFound(String),
    InvalidField(String),
    InvalidLayout(String),
    InvalidModel(String),
    InvalidData(String),
    UnknownFieldType(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SchemaError::NotFound(msg) => write!(f, "Not found: {}", msg),
            SchemaError::InvalidField(msg) => write!(f, "Invalid field: {}", msg),
            SchemaError::InvalidLayout(msg) => write!(f, "Invalid layout: {}", msg),
            SchemaError::InvalidModel(msg) => write!(f, "Invalid content model: {}", msg),
            SchemaError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            SchemaError::UnknownFieldType(msg) => write!(f, "Unknown field type: {}", msg),
        }
    }
}

impl std::error::Error for SchemaError {}
