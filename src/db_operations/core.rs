use crate::error::{CmsError, CmsResult};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

/// Access to the embedded store. Every entity lives in its own named tree
/// and is stored as JSON.
#[derive(Clone)]
pub struct DbOperations {
    /// The underlying sled database instance
    db: sled::Db,
    /// File items keyed by `PK|SK`
    pub(crate) files_tree: sled::Tree,
    /// Secondary index mapping `GSI1_PK|GSI1_SK` to the primary key
    pub(crate) files_gsi1_tree: sled::Tree,
    pub(crate) locales_tree: sled::Tree,
    /// Per-tenant system records such as installed versions
    pub(crate) system_tree: sled::Tree,
}

impl DbOperations {
    pub fn new(db: sled::Db) -> Result<Self, sled::Error> {
        let files_tree = db.open_tree("files")?;
        let files_gsi1_tree = db.open_tree("files_gsi1")?;
        let locales_tree = db.open_tree("i18n_locales")?;
        let system_tree = db.open_tree("system")?;

        Ok(Self {
            db,
            files_tree,
            files_gsi1_tree,
            locales_tree,
            system_tree,
        })
    }

    /// Opens (or creates) the store at `path`.
    pub fn open(path: &std::path::Path) -> CmsResult<Self> {
        let db = sled::open(path)?;
        Ok(Self::new(db)?)
    }

    /// Throwaway in-memory store.
    pub fn temporary() -> CmsResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self::new(db)?)
    }

    pub fn db(&self) -> &sled::Db {
        &self.db
    }

    /// Item counts per tree.
    pub fn get_stats(&self) -> HashMap<String, u64> {
        let mut stats = HashMap::new();
        stats.insert("files".to_string(), self.files_tree.len() as u64);
        stats.insert("locales".to_string(), self.locales_tree.len() as u64);
        stats.insert("system".to_string(), self.system_tree.len() as u64);
        stats
    }

    // ========== GENERIC TREE OPERATIONS ==========

    pub fn store_in_tree<T: Serialize>(
        &self,
        tree: &sled::Tree,
        key: &str,
        item: &T,
    ) -> CmsResult<()> {
        let bytes = serde_json::to_vec(item)?;
        tree.insert(key.as_bytes(), bytes)?;
        tree.flush()?;
        Ok(())
    }

    pub fn get_from_tree<T: DeserializeOwned>(
        &self,
        tree: &sled::Tree,
        key: &str,
    ) -> CmsResult<Option<T>> {
        match tree.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Every item whose key starts with `prefix`, in key order.
    pub fn list_items_with_prefix<T: DeserializeOwned>(
        &self,
        tree: &sled::Tree,
        prefix: &str,
    ) -> CmsResult<Vec<(String, T)>> {
        let mut items = Vec::new();
        for result in tree.scan_prefix(prefix.as_bytes()) {
            let (key, value) = result?;
            let key_str = String::from_utf8_lossy(&key).to_string();
            let item = serde_json::from_slice(&value).map_err(|e| {
                CmsError::Serialization(format!(
                    "Deserialization failed for key '{}': {}",
                    key_str, e
                ))
            })?;
            items.push((key_str, item));
        }
        Ok(items)
    }

    /// Removes `key`, returning whether it existed.
    pub fn delete_from_tree(&self, tree: &sled::Tree, key: &str) -> CmsResult<bool> {
        let existed = tree.remove(key.as_bytes())?.is_some();
        tree.flush()?;
        Ok(existed)
    }

    pub fn exists_in_tree(&self, tree: &sled::Tree, key: &str) -> CmsResult<bool> {
        Ok(tree.contains_key(key.as_bytes())?)
    }
}
