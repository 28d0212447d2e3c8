use crate::logging::config::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file used by the CLI.
pub const CONFIG_PATH_ENV: &str = "CONTENTFOLD_CONFIG";

/// Configuration for a contentfold instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    /// Path where the embedded store keeps its data
    pub storage_path: PathBuf,
    /// Tenant used when a request does not carry one
    #[serde(default = "default_tenant")]
    pub default_tenant: String,
    /// Locale used when a request does not carry one
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Maximum depth of nested composite fields rendered by the schema projector
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
    /// Page size used by list operations when none is requested
    #[serde(default = "default_list_limit")]
    pub default_list_limit: usize,
    #[serde(default)]
    pub logging: LogConfig,
}

fn default_tenant() -> String {
    "root".to_string()
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_max_nesting_depth() -> usize {
    10
}

fn default_list_limit() -> usize {
    50
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("data"),
            default_tenant: default_tenant(),
            default_locale: default_locale(),
            max_nesting_depth: default_max_nesting_depth(),
            default_list_limit: default_list_limit(),
            logging: LogConfig::default(),
        }
    }
}

impl CmsConfig {
    /// Create a new configuration with the specified storage path
    pub fn new(storage_path: PathBuf) -> Self {
        Self {
            storage_path,
            ..Default::default()
        }
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Checks values that serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_nesting_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_nesting_depth must be greater than 0".to_string(),
            ));
        }
        if self.default_list_limit == 0 {
            return Err(ConfigError::Invalid(
                "default_list_limit must be greater than 0".to_string(),
            ));
        }
        if self.default_tenant.is_empty() || self.default_locale.is_empty() {
            return Err(ConfigError::Invalid(
                "default_tenant and default_locale cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Load a configuration from a TOML file.
///
/// A missing file yields the default configuration; a present but malformed
/// file is an error.
pub fn load_cms_config<P: AsRef<Path>>(path: P) -> Result<CmsConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!(
            "Config file {} not found, using defaults",
            path.display()
        );
        return Ok(CmsConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: CmsConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
