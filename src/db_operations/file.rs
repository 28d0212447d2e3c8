use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBy {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(rename = "type", default)]
    pub identity_type: String,
}

/// A file managed by the file manager. The binary lives elsewhere; this is
/// its metadata record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: String,
    pub name: String,
    pub key: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub file_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub tenant: String,
    pub locale: String,
    pub created_on: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<CreatedBy>,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl File {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        tenant: impl Into<String>,
        locale: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let name = name.into();
        Self {
            key: format!("{}/{}", id, name),
            id,
            name,
            size: 0,
            file_type: "application/octet-stream".to_string(),
            tags: Vec::new(),
            tenant: tenant.into(),
            locale: locale.into(),
            created_on: Utc::now(),
            created_by: None,
            meta: Map::new(),
        }
    }

    pub fn with_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = file_type.into();
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_created_by(mut self, created_by: CreatedBy) -> Self {
        self.created_by = Some(created_by);
        self
    }

    pub fn with_private(mut self, private: bool) -> Self {
        self.meta.insert("private".to_string(), Value::Bool(private));
        self
    }

    /// `meta.private`, false when unset.
    pub fn is_private(&self) -> bool {
        self.meta
            .get("private")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
