//! Key-value table seam used by the file storage operations.

use super::core::DbOperations;
use super::error::TableError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One stored row. `data` holds the entity itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableItem {
    #[serde(rename = "PK")]
    pub pk: String,
    #[serde(rename = "SK")]
    pub sk: String,
    #[serde(rename = "GSI1_PK")]
    pub gsi1_pk: String,
    #[serde(rename = "GSI1_SK")]
    pub gsi1_sk: String,
    #[serde(rename = "TYPE")]
    pub item_type: String,
    pub data: Value,
}

/// Sort key condition of an index query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKeyCondition {
    Eq(String),
    Gt(String),
}

impl SortKeyCondition {
    pub fn matches(&self, sort_key: &str) -> bool {
        match self {
            SortKeyCondition::Eq(value) => sort_key == value,
            SortKeyCondition::Gt(value) => sort_key > value.as_str(),
        }
    }
}

#[async_trait]
pub trait FilesTable: Send + Sync {
    fn name(&self) -> &str;

    async fn get(&self, pk: &str, sk: &str) -> Result<Option<TableItem>, TableError>;

    /// Inserts or overwrites the item with the same primary key.
    async fn put(&self, item: TableItem) -> Result<(), TableError>;

    async fn delete(&self, pk: &str, sk: &str) -> Result<(), TableError>;

    /// Writes all items; callers keep batches within the table's batch limit.
    async fn batch_write(&self, items: Vec<TableItem>) -> Result<(), TableError>;

    /// Every item of the GSI1 partition whose sort key satisfies
    /// `condition`, in ascending sort key order.
    async fn query_gsi1(
        &self,
        partition_key: &str,
        condition: &SortKeyCondition,
    ) -> Result<Vec<TableItem>, TableError>;
}

/// [`FilesTable`] backed by the embedded store.
#[derive(Clone)]
pub struct SledFilesTable {
    db: DbOperations,
}

impl SledFilesTable {
    pub fn new(db: DbOperations) -> Self {
        Self { db }
    }

    fn primary_key(pk: &str, sk: &str) -> String {
        format!("{}|{}", pk, sk)
    }

    fn index_key(item: &TableItem) -> String {
        format!("{}|{}", item.gsi1_pk, item.gsi1_sk)
    }
}

#[async_trait]
impl FilesTable for SledFilesTable {
    fn name(&self) -> &str {
        "files"
    }

    async fn get(&self, pk: &str, sk: &str) -> Result<Option<TableItem>, TableError> {
        match self.db.files_tree.get(Self::primary_key(pk, sk))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, item: TableItem) -> Result<(), TableError> {
        self.batch_write(vec![item]).await
    }

    async fn delete(&self, pk: &str, sk: &str) -> Result<(), TableError> {
        let key = Self::primary_key(pk, sk);
        if let Some(bytes) = self.db.files_tree.remove(key.as_bytes())? {
            let item: TableItem = serde_json::from_slice(&bytes)?;
            self.db.files_gsi1_tree.remove(Self::index_key(&item))?;
        }
        self.db.files_tree.flush()?;
        self.db.files_gsi1_tree.flush()?;
        Ok(())
    }

    async fn batch_write(&self, items: Vec<TableItem>) -> Result<(), TableError> {
        let mut primary = sled::Batch::default();
        let mut index = sled::Batch::default();
        for item in &items {
            let key = Self::primary_key(&item.pk, &item.sk);
            primary.insert(key.as_bytes(), serde_json::to_vec(item)?);
            index.insert(Self::index_key(item).as_bytes(), key.as_bytes());
        }
        self.db.files_tree.apply_batch(primary)?;
        self.db.files_gsi1_tree.apply_batch(index)?;
        self.db.files_tree.flush()?;
        self.db.files_gsi1_tree.flush()?;
        Ok(())
    }

    async fn query_gsi1(
        &self,
        partition_key: &str,
        condition: &SortKeyCondition,
    ) -> Result<Vec<TableItem>, TableError> {
        let prefix = format!("{}|", partition_key);
        let mut items = Vec::new();
        for result in self.db.files_gsi1_tree.scan_prefix(prefix.as_bytes()) {
            let (index_key, primary_key) = result?;
            let index_key = String::from_utf8_lossy(&index_key);
            let sort_key = &index_key[prefix.len()..];
            if !condition.matches(sort_key) {
                continue;
            }
            if let Some(bytes) = self.db.files_tree.get(&primary_key)? {
                items.push(serde_json::from_slice(&bytes)?);
            }
        }
        Ok(items)
    }
}
