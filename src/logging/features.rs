//! Feature-specific logging macros
//!
//! Each subsystem logs under its own target so levels can be tuned per
//! feature through [`LogConfig::features`](super::config::LogConfig).

/// Feature categories for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFeature {
    Schema,
    Resolver,
    Storage,
    I18n,
}

impl LogFeature {
    /// Get the target string for this feature
    pub fn target(&self) -> &'static str {
        match self {
            LogFeature::Schema => "contentfold::schema",
            LogFeature::Resolver => "contentfold::resolver",
            LogFeature::Storage => "contentfold::storage",
            LogFeature::I18n => "contentfold::i18n",
        }
    }

    /// Maps a configuration key to its feature.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "schema" => Some(LogFeature::Schema),
            "resolver" => Some(LogFeature::Resolver),
            "storage" => Some(LogFeature::Storage),
            "i18n" => Some(LogFeature::I18n),
            _ => None,
        }
    }
}

#[macro_export]
macro_rules! log_schema_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "contentfold::schema", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_schema_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "contentfold::schema", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_resolver_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "contentfold::resolver", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_resolver_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "contentfold::resolver", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_storage_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "contentfold::storage", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_storage_error {
    ($($arg:tt)*) => {
        log::error!(target: "contentfold::storage", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_i18n_info {
    ($($arg:tt)*) => {
        log::info!(target: "contentfold::i18n", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_i18n_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "contentfold::i18n", $($arg)*)
    };
}
