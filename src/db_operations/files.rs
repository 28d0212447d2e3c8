//! Storage operations of the file manager.
//!
//! Files are written under a per-file partition key and indexed in a
//! tenant/locale listing partition (GSI1). Listing reads the whole partition
//! and filters, sorts and pages in process; the cursor is the encoded offset.
//! Nothing here retries.

use super::cursor::{decode_offset, encode_cursor};
use super::error::{
    StorageError, TableError, BATCH_CREATE_FILES_ERROR, CREATE_FILE_ERROR, DELETE_FILE_ERROR,
    DYNAMODB_ERROR, FILE_LIST_ERROR, GET_FILE_ERROR, UPDATE_FILE_ERROR,
};
use super::file::File;
use super::files_table::{FilesTable, SortKeyCondition, TableItem};
use super::filter::FilesWhere;
use super::keys::{file_partition_key, files_gsi1_partition_key, FILE_ITEM_TYPE, FILE_SORT_KEY};
use super::sort::sort_files;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Maximum number of puts sent to the table in one batch write.
pub const BATCH_WRITE_LIMIT: usize = 25;

/// Point lookup key of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileWhere {
    pub tenant: String,
    pub locale: String,
    pub id: String,
}

impl FileWhere {
    pub fn new(tenant: impl Into<String>, locale: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            locale: locale.into(),
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilesListParams {
    #[serde(rename = "where")]
    pub filter: FilesWhere,
    pub limit: usize,
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub sort: Vec<String>,
}

impl FilesListParams {
    pub fn new(filter: FilesWhere, limit: usize) -> Self {
        Self {
            filter,
            limit,
            after: None,
            sort: Vec::new(),
        }
    }

    pub fn after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn sort(mut self, sort: Vec<String>) -> Self {
        self.sort = sort;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    pub has_more_items: bool,
    pub total_count: usize,
    pub cursor: Option<String>,
}

fn error_payload(error: &TableError) -> Value {
    json!({ "message": error.to_string() })
}

fn message_or(error: &TableError, fallback: &str) -> String {
    let message = error.to_string();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

pub struct FilesStorageOperations {
    table: Arc<dyn FilesTable>,
}

impl FilesStorageOperations {
    pub fn new(table: Arc<dyn FilesTable>) -> Self {
        Self { table }
    }

    fn item(file: &File) -> Result<TableItem, serde_json::Error> {
        Ok(TableItem {
            pk: file_partition_key(&file.tenant, &file.locale, &file.id),
            sk: FILE_SORT_KEY.to_string(),
            gsi1_pk: files_gsi1_partition_key(&file.tenant, &file.locale),
            gsi1_sk: file.id.clone(),
            item_type: FILE_ITEM_TYPE.to_string(),
            data: serde_json::to_value(file)?,
        })
    }

    fn files_from_items(items: Vec<TableItem>) -> Result<Vec<File>, TableError> {
        items
            .into_iter()
            .map(|item| serde_json::from_value(item.data).map_err(TableError::from))
            .collect()
    }

    pub async fn get(&self, where_: &FileWhere) -> Result<Option<File>, StorageError> {
        let pk = file_partition_key(&where_.tenant, &where_.locale, &where_.id);
        let result: Result<Option<File>, TableError> = match self.table.get(&pk, FILE_SORT_KEY).await {
            Ok(Some(item)) => serde_json::from_value(item.data)
                .map(Some)
                .map_err(TableError::from),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };
        result.map_err(|e| {
            StorageError::new(
                GET_FILE_ERROR,
                message_or(&e, "Could not fetch requested file."),
                json!({ "error": error_payload(&e), "where": where_ }),
            )
        })
    }

    pub async fn create(&self, file: File) -> Result<File, StorageError> {
        let create_error = |e: TableError, item: Value| {
            StorageError::new(
                CREATE_FILE_ERROR,
                message_or(&e, "Could not create a new file in the store."),
                json!({ "error": error_payload(&e), "item": item }),
            )
        };

        let item = Self::item(&file)
            .map_err(|e| create_error(TableError::from(e), json!({ "data": file })))?;
        let item_json = serde_json::to_value(&item).unwrap_or(Value::Null);
        self.table
            .put(item)
            .await
            .map_err(|e| create_error(e, item_json))?;

        crate::log_storage_debug!("Stored file '{}'", file.id);
        Ok(file)
    }

    /// Overwrites the file. A failing write surfaces as `UPDATE_FILE_ERROR`
    /// carrying the create payload.
    pub async fn update(&self, file: File) -> Result<File, StorageError> {
        match self.create(file).await {
            Ok(file) => Ok(file),
            Err(e) if e.code == CREATE_FILE_ERROR => Err(StorageError::new(
                UPDATE_FILE_ERROR,
                "Could not update a file in the store.",
                e.data,
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn delete(&self, file: &File) -> Result<(), StorageError> {
        let pk = file_partition_key(&file.tenant, &file.locale, &file.id);
        self.table.delete(&pk, FILE_SORT_KEY).await.map_err(|e| {
            StorageError::new(
                DELETE_FILE_ERROR,
                message_or(&e, "Could not delete file from the store."),
                json!({
                    "error": error_payload(&e),
                    "file": file,
                    "keys": { "PK": pk, "SK": FILE_SORT_KEY },
                }),
            )
        })
    }

    /// Writes `files` in batches of [`BATCH_WRITE_LIMIT`]. Batches already
    /// written stay written when a later one fails.
    pub async fn create_batch(&self, files: Vec<File>) -> Result<Vec<File>, StorageError> {
        let batch_error = |e: TableError, files: &[File]| {
            StorageError::new(
                BATCH_CREATE_FILES_ERROR,
                message_or(&e, "Could not batch insert a list of files."),
                json!({ "error": error_payload(&e), "files": files }),
            )
        };

        let items = files
            .iter()
            .map(Self::item)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| batch_error(TableError::from(e), &files))?;

        for chunk in items.chunks(BATCH_WRITE_LIMIT) {
            self.table
                .batch_write(chunk.to_vec())
                .await
                .map_err(|e| batch_error(e, &files))?;
        }
        crate::log_storage_debug!("Stored {} files in batch", files.len());
        Ok(files)
    }

    /// Filtered, sorted page of files plus listing metadata.
    pub async fn list(&self, params: &FilesListParams) -> Result<(Vec<File>, ListMeta), StorageError> {
        let where_ = &params.filter;
        let partition_key = files_gsi1_partition_key(&where_.tenant, &where_.locale);
        let condition = match &where_.id {
            Some(id) => SortKeyCondition::Eq(id.clone()),
            None => SortKeyCondition::Gt(" ".to_string()),
        };

        let loaded = match self.table.query_gsi1(&partition_key, &condition).await {
            Ok(items) => Self::files_from_items(items),
            Err(e) => Err(e),
        };
        let files = loaded.map_err(|e| {
            crate::log_storage_error!("Listing files of '{}' failed: {}", partition_key, e);
            StorageError::new(
                FILE_LIST_ERROR,
                message_or(&e, "Could not query for the files."),
                json!({
                    "error": error_payload(&e),
                    "where": where_,
                    "limit": params.limit,
                    "after": params.after,
                    "sort": params.sort,
                    "queryParams": {
                        "options": { "index": "GSI1", "condition": condition },
                        "partitionKey": partition_key,
                        "table": self.table.name(),
                    },
                }),
            )
        })?;

        let filtered = where_.apply(files);
        let total_count = filtered.len();
        let sorted = sort_files(filtered, &params.sort);

        let start = decode_offset(params.after.as_deref());
        let end = start.saturating_add(params.limit);
        let page: Vec<File> = sorted
            .into_iter()
            .skip(start)
            .take(params.limit)
            .collect();

        let meta = ListMeta {
            has_more_items: total_count > end,
            total_count,
            cursor: (!page.is_empty()).then(|| encode_cursor(end)),
        };
        Ok((page, meta))
    }

    /// Distinct tags of the matching files, in first-seen order. Never
    /// paginated.
    pub async fn tags(&self, where_: &FilesWhere) -> Result<(Vec<String>, ListMeta), StorageError> {
        let partition_key = files_gsi1_partition_key(&where_.tenant, &where_.locale);
        let condition = SortKeyCondition::Gt(" ".to_string());

        let loaded = match self.table.query_gsi1(&partition_key, &condition).await {
            Ok(items) => Self::files_from_items(items),
            Err(e) => Err(e),
        };
        let files = loaded.map_err(|e| {
            crate::log_storage_error!("Loading tags of '{}' failed: {}", partition_key, e);
            StorageError::new(
                DYNAMODB_ERROR,
                message_or(&e, "Error in the store query."),
                json!({
                    "error": error_payload(&e),
                    "query": {
                        "partitionKey": partition_key,
                        "options": { "index": "GSI1", "condition": condition },
                    },
                }),
            )
        })?;

        let mut tags: Vec<String> = Vec::new();
        for file in where_.apply(files) {
            for tag in file.tags {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
        }

        let meta = ListMeta {
            has_more_items: false,
            total_count: tags.len(),
            cursor: None,
        };
        Ok((tags, meta))
    }
}
