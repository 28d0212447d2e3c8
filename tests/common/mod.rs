//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use contentfold::db_operations::{File, FilesStorageOperations, SledFilesTable};
use contentfold::DbOperations;
use std::sync::Arc;
use tempfile::TempDir;

pub const TENANT: &str = "root";
pub const LOCALE: &str = "en-US";

/// Store opened in a temporary directory that lives as long as the fixture.
pub struct StoreFixture {
    pub db_ops: DbOperations,
    pub _temp_dir: TempDir,
}

impl StoreFixture {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let db = sled::Config::new()
            .path(temp_dir.path())
            .temporary(true)
            .open()
            .expect("temporary sled db");
        let db_ops = DbOperations::new(db).expect("db operations");
        Self {
            db_ops,
            _temp_dir: temp_dir,
        }
    }

    pub fn files(&self) -> FilesStorageOperations {
        FilesStorageOperations::new(Arc::new(SledFilesTable::new(self.db_ops.clone())))
    }
}

pub fn file(id: &str, name: &str, tags: &[&str]) -> File {
    File::new(id, name, TENANT, LOCALE)
        .with_type("image/png")
        .with_size(1024)
        .with_tags(tags.iter().copied())
}
