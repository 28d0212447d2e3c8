//! Locales of a tenant and the i18n system record.
//!
//! Every tenant has at most one default locale. The default can only be
//! moved, never removed, and the last locale of a tenant cannot be deleted.

pub mod locale_codes;

use crate::db_operations::{CreatedBy, DbOperations};
use crate::error::CmsError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use locale_codes::{search_locale_codes, LOCALE_CODES};

/// Permission required to read or manage locales.
pub const LOCALE_PERMISSION: &str = "i18n.locale";

pub const NOT_FOUND: &str = "NOT_FOUND";
pub const I18N_INSTALL_ABORTED: &str = "I18N_INSTALL_ABORTED";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
    pub code: String,
    #[serde(default)]
    pub default: bool,
    pub created_on: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<CreatedBy>,
}

impl Locale {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            default: false,
            created_on: Utc::now(),
            created_by: None,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    pub fn with_created_by(mut self, created_by: Option<CreatedBy>) -> Self {
        self.created_by = created_by;
        self
    }
}

/// Installed version of the i18n system for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemRecord {
    pub version: String,
}

/// Locale a request runs under, per context (`default`, `content`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentLocale {
    pub context: String,
    pub locale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nInformation {
    pub locales: Vec<Locale>,
    pub default_locale: Option<Locale>,
    pub current_locales: Vec<CurrentLocale>,
}

#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    #[error("Locale \"{0}\" not found.")]
    NotFound(String),

    #[error("Locale with key \"{0}\" already exists.")]
    AlreadyExists(String),

    #[error("Cannot delete default locale, please set another locale as default first.")]
    DeleteDefault,

    #[error("Cannot delete the last locale.")]
    DeleteLast,

    #[error("I18N is already installed.")]
    InstallAborted,

    #[error("{0}")]
    Store(#[from] CmsError),
}

impl I18nError {
    /// Error code reported in response envelopes, if the error has one.
    pub fn code(&self) -> Option<String> {
        match self {
            // duplicates are reported as NOT_FOUND too
            I18nError::NotFound(_) | I18nError::AlreadyExists(_) => Some(NOT_FOUND.to_string()),
            I18nError::DeleteDefault | I18nError::DeleteLast => None,
            I18nError::InstallAborted => Some(I18N_INSTALL_ABORTED.to_string()),
            I18nError::Store(err) => Some(err.code()),
        }
    }
}

pub type I18nResult<T> = Result<T, I18nError>;

/// Locale management on top of the embedded store.
#[derive(Clone)]
pub struct I18nService {
    db: DbOperations,
}

impl I18nService {
    pub fn new(db: DbOperations) -> Self {
        Self { db }
    }

    pub fn get_by_code(&self, tenant: &str, code: &str) -> I18nResult<Option<Locale>> {
        Ok(self.db.get_locale(tenant, code)?)
    }

    pub fn list(&self, tenant: &str) -> I18nResult<Vec<Locale>> {
        Ok(self.db.list_locales(tenant)?)
    }

    pub fn get_default(&self, tenant: &str) -> I18nResult<Option<Locale>> {
        Ok(self.list(tenant)?.into_iter().find(|locale| locale.default))
    }

    /// Stores a new locale. A default locale takes the default flag away
    /// from every other locale of the tenant.
    pub fn create(&self, tenant: &str, locale: Locale) -> I18nResult<Locale> {
        if self.get_by_code(tenant, &locale.code)?.is_some() {
            return Err(I18nError::AlreadyExists(locale.code));
        }
        self.db.store_locale(tenant, &locale)?;
        if locale.default {
            self.update_default(tenant, &locale.code)?;
        }
        crate::log_i18n_info!("Created locale '{}' for tenant '{}'", locale.code, tenant);
        Ok(locale)
    }

    /// Applies `default` when given. A locale that was the default stays the
    /// default, so the tenant is never left without one.
    pub fn update(&self, tenant: &str, code: &str, default: Option<bool>) -> I18nResult<Locale> {
        let existing = self
            .get_by_code(tenant, code)?
            .ok_or_else(|| I18nError::NotFound(code.to_string()))?;

        let mut updated = existing.clone();
        if let Some(default) = default {
            updated.default = default;
        }
        self.db.store_locale(tenant, &updated)?;

        if existing.default || updated.default {
            self.update_default(tenant, code)?;
            updated.default = true;
        }
        Ok(updated)
    }

    /// Makes `code` the only default locale of the tenant.
    pub fn update_default(&self, tenant: &str, code: &str) -> I18nResult<()> {
        for mut locale in self.list(tenant)? {
            let should_be_default = locale.code == code;
            if locale.default != should_be_default {
                locale.default = should_be_default;
                self.db.store_locale(tenant, &locale)?;
            }
        }
        Ok(())
    }

    /// Deletes a locale that is neither the default nor the last one.
    pub fn delete(&self, tenant: &str, code: &str) -> I18nResult<Locale> {
        let locale = self
            .get_by_code(tenant, code)?
            .ok_or_else(|| I18nError::NotFound(code.to_string()))?;

        if locale.default {
            crate::log_i18n_warn!("Refusing to delete default locale '{}'", code);
            return Err(I18nError::DeleteDefault);
        }
        if self.list(tenant)?.len() == 1 {
            crate::log_i18n_warn!("Refusing to delete the last locale '{}'", code);
            return Err(I18nError::DeleteLast);
        }

        self.db.delete_locale(tenant, code)?;
        crate::log_i18n_info!("Deleted locale '{}' for tenant '{}'", code, tenant);
        Ok(locale)
    }

    /// Installed version, or `None` before installation.
    pub fn version(&self, tenant: &str) -> I18nResult<Option<String>> {
        Ok(self.db.get_i18n_system(tenant)?.map(|record| record.version))
    }

    /// Creates the first (default) locale and records the installed version.
    pub fn install(&self, tenant: &str, code: &str, created_by: Option<CreatedBy>) -> I18nResult<()> {
        if self.version(tenant)?.is_some() {
            return Err(I18nError::InstallAborted);
        }

        let locale = Locale::new(code).as_default().with_created_by(created_by);
        match self.create(tenant, locale) {
            Ok(_) => {}
            Err(I18nError::AlreadyExists(_)) => self.update_default(tenant, code)?,
            Err(e) => return Err(e),
        }

        self.db.store_i18n_system(
            tenant,
            &SystemRecord {
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        )?;
        crate::log_i18n_info!("Installed i18n for tenant '{}' with locale '{}'", tenant, code);
        Ok(())
    }

    pub fn information(&self, tenant: &str, current_locale: &str) -> I18nResult<I18nInformation> {
        let locales = self.list(tenant)?;
        let default_locale = locales.iter().find(|locale| locale.default).cloned();
        let current_locales = ["default", "content"]
            .iter()
            .map(|context| CurrentLocale {
                context: context.to_string(),
                locale: current_locale.to_string(),
            })
            .collect();
        Ok(I18nInformation {
            locales,
            default_locale,
            current_locales,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> I18nService {
        I18nService::new(DbOperations::temporary().unwrap())
    }

    #[test]
    fn new_default_replaces_old_default() {
        let i18n = service();
        i18n.create("root", Locale::new("en-US").as_default()).unwrap();
        i18n.create("root", Locale::new("de-DE").as_default()).unwrap();

        let defaults: Vec<String> = i18n
            .list("root")
            .unwrap()
            .into_iter()
            .filter(|l| l.default)
            .map(|l| l.code)
            .collect();
        assert_eq!(defaults, vec!["de-DE".to_string()]);
    }

    #[test]
    fn duplicate_code_is_rejected() {
        let i18n = service();
        i18n.create("root", Locale::new("en-US")).unwrap();
        let err = i18n.create("root", Locale::new("en-US")).unwrap_err();
        assert_eq!(err.to_string(), "Locale with key \"en-US\" already exists.");
        assert_eq!(err.code().as_deref(), Some(NOT_FOUND));
    }

    #[test]
    fn default_cannot_be_unset_by_update() {
        let i18n = service();
        i18n.create("root", Locale::new("en-US").as_default()).unwrap();
        let updated = i18n.update("root", "en-US", Some(false)).unwrap();
        assert!(updated.default);
        assert!(i18n.get_default("root").unwrap().is_some());
    }

    #[test]
    fn tenants_are_isolated() {
        let i18n = service();
        i18n.create("root", Locale::new("en-US")).unwrap();
        assert!(i18n.list("other").unwrap().is_empty());
    }

    #[test]
    fn install_twice_aborts() {
        let i18n = service();
        assert_eq!(i18n.version("root").unwrap(), None);
        i18n.install("root", "en-US", None).unwrap();
        assert!(i18n.version("root").unwrap().is_some());

        let err = i18n.install("root", "en-US", None).unwrap_err();
        assert_eq!(err.code().as_deref(), Some(I18N_INSTALL_ABORTED));
    }

    #[test]
    fn information_lists_current_locales() {
        let i18n = service();
        i18n.install("root", "en-US", None).unwrap();
        let info = i18n.information("root", "de-DE").unwrap();
        assert_eq!(info.default_locale.map(|l| l.code), Some("en-US".to_string()));
        assert_eq!(info.current_locales.len(), 2);
        assert!(info.current_locales.iter().all(|c| c.locale == "de-DE"));
    }
}
