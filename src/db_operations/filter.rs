//! In-process filtering of listed files.

use super::file::File;
use serde::{Deserialize, Serialize};

/// Conditions of a file listing. `tenant` and `locale` select the partition;
/// every other set condition must hold for a file to be kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilesWhere {
    pub tenant: String,
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Case-insensitive substring of the name or any tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_in: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Files carrying at least one of these tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_in: Option<Vec<String>>,
    /// Files carrying all of these tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_and_in: Option<Vec<String>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(rename = "type_in", default, skip_serializing_if = "Option::is_none")]
    pub type_in: Option<Vec<String>>,
    #[serde(rename = "createdBy", default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
}

impl FilesWhere {
    pub fn new(tenant: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            locale: locale.into(),
            ..Default::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Whether `file` satisfies every set condition.
    pub fn matches(&self, file: &File) -> bool {
        if let Some(id) = &self.id {
            if &file.id != id {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let in_name = file.name.to_lowercase().contains(&needle);
            let in_tags = file.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            if !in_name && !in_tags {
                return false;
            }
        }
        if let Some(ids) = &self.id_in {
            if !ids.contains(&file.id) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !file.tags.contains(tag) {
                return false;
            }
        }
        if let Some(tags) = &self.tag_in {
            if !tags.iter().any(|t| file.tags.contains(t)) {
                return false;
            }
        }
        if let Some(tags) = &self.tag_and_in {
            if !tags.iter().all(|t| file.tags.contains(t)) {
                return false;
            }
        }
        if let Some(file_type) = &self.file_type {
            if &file.file_type != file_type {
                return false;
            }
        }
        if let Some(types) = &self.type_in {
            if !types.contains(&file.file_type) {
                return false;
            }
        }
        if let Some(created_by) = &self.created_by {
            let owner = file.created_by.as_ref().map(|c| c.id.as_str());
            if owner != Some(created_by.as_str()) {
                return false;
            }
        }
        if let Some(private) = self.private {
            if file.is_private() != private {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, files: Vec<File>) -> Vec<File> {
        files.into_iter().filter(|file| self.matches(file)).collect()
    }
}
