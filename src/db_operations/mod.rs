//! Embedded storage: generic sled tree access, the file storage operations
//! and locale persistence.

pub mod core;
pub mod cursor;
pub mod error;
pub mod file;
pub mod files;
pub mod files_table;
pub mod filter;
pub mod keys;
mod locale_operations;
pub mod sort;

pub use core::DbOperations;
pub use cursor::{decode_cursor, encode_cursor};
pub use error::{StorageError, TableError};
pub use file::{CreatedBy, File};
pub use files::{FileWhere, FilesListParams, FilesStorageOperations, ListMeta};
pub use files_table::{FilesTable, SledFilesTable, SortKeyCondition, TableItem};
pub use filter::FilesWhere;
