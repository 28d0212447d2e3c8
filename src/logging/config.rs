//! `[logging]` settings: a global level, per-feature levels and console
//! formatting, read from TOML and overridable through `CONTENTFOLD_LOG_*`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const VALID_LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

const FEATURE_LEVELS: [(&str, &str); 4] = [
    ("schema", "INFO"),
    ("resolver", "INFO"),
    ("storage", "WARN"),
    ("i18n", "INFO"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub general: GeneralConfig,
    pub console: ConsoleConfig,
    /// Level per log target, e.g. `storage = "WARN"`.
    pub features: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Applies to every target without its own entry in `features`.
    pub default_level: String,
    pub enable_colors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub include_timestamp: bool,
    /// Print the log target next to the level.
    pub include_module: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            console: ConsoleConfig::default(),
            features: FEATURE_LEVELS
                .iter()
                .map(|(feature, level)| (feature.to_string(), level.to_string()))
                .collect(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_level: "INFO".to_string(),
            enable_colors: true,
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            include_timestamp: true,
            include_module: true,
        }
    }
}

impl LogConfig {
    /// Reads a standalone logging TOML file, then applies env overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let parsed: LogConfig =
            toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        parsed.finish()
    }

    /// Defaults plus env overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().finish()
    }

    fn finish(mut self) -> Result<Self, ConfigError> {
        self.apply_env_overrides();
        self.validate()?;
        Ok(self)
    }

    /// `CONTENTFOLD_LOG_LEVEL`, `CONTENTFOLD_LOG_COLORS` and
    /// `CONTENTFOLD_LOG_FEATURE_<NAME>` win over file values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::vars());
    }

    /// Applies `CONTENTFOLD_LOG_*` pairs from `vars`.
    pub fn apply_overrides<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                "CONTENTFOLD_LOG_LEVEL" => self.general.default_level = value.to_uppercase(),
                "CONTENTFOLD_LOG_COLORS" => {
                    self.general.enable_colors = value.parse().unwrap_or(true)
                }
                _ => {
                    if let Some(feature) = key.strip_prefix("CONTENTFOLD_LOG_FEATURE_") {
                        self.features
                            .insert(feature.to_lowercase(), value.to_uppercase());
                    }
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.general.default_level.as_str();
        if !VALID_LEVELS.contains(&level) {
            return Err(ConfigError::InvalidLevel(level.to_string()));
        }

        match self
            .features
            .iter()
            .find(|(_, level)| !VALID_LEVELS.contains(&level.as_str()))
        {
            Some((feature, level)) => Err(ConfigError::InvalidFeatureLevel(
                feature.clone(),
                level.clone(),
            )),
            None => Ok(()),
        }
    }
}

/// Parses one of the configured level names.
pub fn parse_level(level: &str) -> Option<log::LevelFilter> {
    match level {
        "TRACE" => Some(log::LevelFilter::Trace),
        "DEBUG" => Some(log::LevelFilter::Debug),
        "INFO" => Some(log::LevelFilter::Info),
        "WARN" => Some(log::LevelFilter::Warn),
        "ERROR" => Some(log::LevelFilter::Error),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read logging config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed logging config: {0}")]
    Parse(String),
    #[error("Unknown log level '{0}'")]
    InvalidLevel(String),
    #[error("Unknown log level for feature '{0}': {1}")]
    InvalidFeatureLevel(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = LogConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.features.get("storage").map(String::as_str), Some("WARN"));
    }

    #[test]
    fn invalid_feature_level_is_rejected() {
        let mut config = LogConfig::default();
        config.features.insert("schema".to_string(), "LOUD".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFeatureLevel(f, _)) if f == "schema"
        ));
    }

    #[test]
    fn parses_partial_toml() {
        let config: LogConfig = toml::from_str(
            r#"
            [general]
            default_level = "DEBUG"

            [features]
            storage = "TRACE"
            "#,
        )
        .unwrap();
        assert_eq!(config.general.default_level, "DEBUG");
        assert!(config.general.enable_colors);
        assert_eq!(config.features.get("storage").map(String::as_str), Some("TRACE"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_style_overrides_win_over_file_values() {
        let mut config: LogConfig = toml::from_str("[features]\nstorage = \"ERROR\"").unwrap();
        config.apply_overrides(vec![
            ("CONTENTFOLD_LOG_LEVEL".to_string(), "debug".to_string()),
            ("CONTENTFOLD_LOG_COLORS".to_string(), "false".to_string()),
            ("CONTENTFOLD_LOG_FEATURE_STORAGE".to_string(), "trace".to_string()),
            ("CONTENTFOLD_LOG_FEATURE_I18N".to_string(), "warn".to_string()),
            ("PATH".to_string(), "/usr/bin".to_string()),
        ]);

        assert_eq!(config.general.default_level, "DEBUG");
        assert!(!config.general.enable_colors);
        assert_eq!(config.features.get("storage").map(String::as_str), Some("TRACE"));
        assert_eq!(config.features.get("i18n").map(String::as_str), Some("WARN"));
        assert_eq!(config.features.get("schema").map(String::as_str), Some("INFO"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overridden_level_is_still_validated() {
        let mut config = LogConfig::default();
        config.apply_overrides([("CONTENTFOLD_LOG_LEVEL".to_string(), "chatty".to_string())]);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLevel(l)) if l == "CHATTY"));
    }

    #[test]
    fn level_names_map_to_filters() {
        assert_eq!(parse_level("WARN"), Some(log::LevelFilter::Warn));
        assert_eq!(parse_level("warn"), None);
    }
}
