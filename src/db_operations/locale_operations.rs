use super::core::DbOperations;
use crate::error::CmsResult;
use crate::i18n::{Locale, SystemRecord};

fn locale_key(tenant: &str, code: &str) -> String {
    format!("T#{}#I18N#L#{}", tenant, code)
}

fn locales_prefix(tenant: &str) -> String {
    format!("T#{}#I18N#L#", tenant)
}

fn system_key(tenant: &str) -> String {
    format!("T#{}#I18N#SYSTEM", tenant)
}

impl DbOperations {
    pub fn store_locale(&self, tenant: &str, locale: &Locale) -> CmsResult<()> {
        self.store_in_tree(&self.locales_tree, &locale_key(tenant, &locale.code), locale)
    }

    pub fn get_locale(&self, tenant: &str, code: &str) -> CmsResult<Option<Locale>> {
        self.get_from_tree(&self.locales_tree, &locale_key(tenant, code))
    }

    /// Locales of `tenant` ordered by code.
    pub fn list_locales(&self, tenant: &str) -> CmsResult<Vec<Locale>> {
        let items: Vec<(String, Locale)> =
            self.list_items_with_prefix(&self.locales_tree, &locales_prefix(tenant))?;
        Ok(items.into_iter().map(|(_, locale)| locale).collect())
    }

    pub fn delete_locale(&self, tenant: &str, code: &str) -> CmsResult<bool> {
        self.delete_from_tree(&self.locales_tree, &locale_key(tenant, code))
    }

    pub fn get_i18n_system(&self, tenant: &str) -> CmsResult<Option<SystemRecord>> {
        self.get_from_tree(&self.system_tree, &system_key(tenant))
    }

    pub fn store_i18n_system(&self, tenant: &str, record: &SystemRecord) -> CmsResult<()> {
        self.store_in_tree(&self.system_tree, &system_key(tenant), record)
    }
}
