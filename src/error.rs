use crate::config::ConfigError;
use crate::db_operations::StorageError;
use crate::schema::types::SchemaError;
use std::fmt;
use std::io;

/// Unified error type for the entire crate.
///
/// Subsystem errors keep their own types (`SchemaError`, `StorageError`,
/// `ConfigError`) and are folded into this enum when they cross a module
/// boundary, so callers can match on the category while the original
/// payload stays available.
#[derive(Debug)]
pub enum CmsError {
    /// Errors related to content models and field definitions
    Schema(SchemaError),

    /// Coded errors raised by the storage operations adapter
    Storage(StorageError),

    /// A storage transform failed to encode or decode a field value
    Transform(String),

    /// A field resolver failed
    Resolver(String),

    /// Errors related to configuration
    Config(ConfigError),

    /// Errors related to the underlying key-value store
    Database(String),

    /// Errors related to serialization/deserialization
    Serialization(String),

    /// Errors related to IO operations
    Io(io::Error),
}

impl CmsError {
    /// Stable error code used in GraphQL error envelopes.
    pub fn code(&self) -> String {
        match self {
            Self::Schema(_) => "SCHEMA_ERROR".to_string(),
            Self::Storage(err) => err.code.clone(),
            Self::Transform(_) => "STORAGE_TRANSFORM_ERROR".to_string(),
            Self::Resolver(_) => "RESOLVER_ERROR".to_string(),
            Self::Config(_) => "CONFIG_ERROR".to_string(),
            Self::Database(_) => "DATABASE_ERROR".to_string(),
            Self::Serialization(_) => "SERIALIZATION_ERROR".to_string(),
            Self::Io(_) => "IO_ERROR".to_string(),
        }
    }
}

impl fmt::Display for CmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(err) => write!(f, "Schema error: {}", err),
            Self::Storage(err) => write!(f, "Storage error: {}", err),
            Self::Transform(msg) => write!(f, "Storage transform error: {}", msg),
            Self::Resolver(msg) => write!(f, "Resolver error: {}", msg),
            Self::Config(err) => write!(f, "Configuration error: {}", err),
            Self::Database(msg) => write!(f, "Database error: {}", msg),
            Self::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for CmsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CmsError::Schema(err) => Some(err),
            CmsError::Storage(err) => Some(err),
            CmsError::Config(err) => Some(err),
            CmsError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SchemaError> for CmsError {
    fn from(error: SchemaError) -> Self {
        CmsError::Schema(error)
    }
}

impl From<StorageError> for CmsError {
    fn from(error: StorageError) -> Self {
        CmsError::Storage(error)
    }
}

impl From<ConfigError> for CmsError {
    fn from(error: ConfigError) -> Self {
        CmsError::Config(error)
    }
}

impl From<io::Error> for CmsError {
    fn from(error: io::Error) -> Self {
        CmsError::Io(error)
    }
}

impl From<serde_json::Error> for CmsError {
    fn from(error: serde_json::Error) -> Self {
        CmsError::Serialization(error.to_string())
    }
}

impl From<sled::Error> for CmsError {
    fn from(error: sled::Error) -> Self {
        CmsError::Database(error.to_string())
    }
}

/// Result type alias for operations that can result in a CmsError
pub type CmsResult<T> = Result<T, CmsError>;
