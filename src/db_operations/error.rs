use serde::Serialize;
use serde_json::Value;

pub const GET_FILE_ERROR: &str = "GET_FILE_ERROR";
pub const CREATE_FILE_ERROR: &str = "CREATE_FILE_ERROR";
pub const UPDATE_FILE_ERROR: &str = "UPDATE_FILE_ERROR";
pub const DELETE_FILE_ERROR: &str = "DELETE_FILE_ERROR";
pub const BATCH_CREATE_FILES_ERROR: &str = "BATCH_CREATE_FILES_ERROR";
pub const FILE_LIST_ERROR: &str = "FILE_LIST_ERROR";
pub const DYNAMODB_ERROR: &str = "DYNAMODB_ERROR";

/// Coded error raised by the storage operations. `data` carries the
/// underlying failure and the input that caused it.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{message} ({code})")]
pub struct StorageError {
    pub code: String,
    pub message: String,
    pub data: Value,
}

impl StorageError {
    pub fn new(code: impl Into<String>, message: impl Into<String>, data: Value) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data,
        }
    }
}

/// Failure reported by a [`FilesTable`](super::files_table::FilesTable).
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("{0}")]
    Database(#[from] sled::Error),
    #[error("Malformed item: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("{0}")]
    Rejected(String),
}
