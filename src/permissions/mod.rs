//! Identity and permission lookup for a single request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(rename = "type", default)]
    pub identity_type: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            identity_type: "admin".to_string(),
            display_name: display_name.into(),
        }
    }
}

/// A named grant, optionally carrying extra options such as `own` or `rwd`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub name: String,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl Permission {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Map::new(),
        }
    }

    /// `*` matches everything, `i18n.*` matches every permission under `i18n.`.
    fn matches(&self, name: &str) -> bool {
        if self.name == "*" || self.name == name {
            return true;
        }
        match self.name.strip_suffix('*') {
            Some(prefix) => name.starts_with(prefix),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityContext {
    pub identity: Option<Identity>,
    pub tenant: Option<String>,
    pub permissions: Vec<Permission>,
}

impl SecurityContext {
    pub fn new(tenant: impl Into<String>) -> Self {
        Self {
            identity: None,
            tenant: Some(tenant.into()),
            permissions: Vec::new(),
        }
    }

    /// Context with a full-access grant.
    pub fn full_access(tenant: impl Into<String>, identity: Identity) -> Self {
        Self::new(tenant)
            .with_identity(identity)
            .with_permission(Permission::new("*"))
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    /// First grant matching `name`, if any.
    pub fn get_permission(&self, name: &str) -> Option<&Permission> {
        self.permissions.iter().find(|p| p.matches(name))
    }

    pub fn has_permission(&self, name: &str) -> bool {
        self.get_permission(name).is_some()
    }

    pub fn identity_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_wildcard_grants() {
        let ctx = SecurityContext::new("root").with_permission(Permission::new("i18n.*"));
        assert!(ctx.has_permission("i18n.locale"));
        assert!(!ctx.has_permission("fm.file"));

        let admin = SecurityContext::full_access("root", Identity::new("1", "Admin"));
        assert!(admin.has_permission("fm.file"));
        assert_eq!(admin.identity_id(), Some("1"));
    }

    #[test]
    fn no_grants_means_no_access() {
        assert!(SecurityContext::default().get_permission("i18n.locale").is_none());
    }
}
