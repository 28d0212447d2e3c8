//! # Logging System
//!
//! Configures the `log` facade with an `env_logger` backend. The general level
//! comes from [`LogConfig`], and each feature target (`contentfold::schema`,
//! `contentfold::storage`, ...) can be given its own level.

pub mod config;
pub mod features;

use config::{parse_level, LogConfig};
use features::LogFeature;
use once_cell::sync::OnceCell;
use std::io::Write;
use std::sync::{Arc, RwLock};

/// Global logging configuration instance
static LOGGING_CONFIG: OnceCell<Arc<RwLock<LogConfig>>> = OnceCell::new();

pub struct LoggingSystem;

impl LoggingSystem {
    /// Initialize the logging system with default configuration
    pub fn init_default() -> Result<(), LoggingError> {
        Self::init_with_config(LogConfig::default())
    }

    /// Initialize the logging system with a custom configuration
    pub fn init_with_config(config: LogConfig) -> Result<(), LoggingError> {
        config.validate()?;

        let default_level =
            parse_level(&config.general.default_level).unwrap_or(log::LevelFilter::Info);

        let mut builder = env_logger::Builder::new();
        builder.filter_level(default_level);
        for (feature, level) in &config.features {
            match (LogFeature::from_name(feature), parse_level(level)) {
                (Some(feature), Some(level)) => {
                    builder.filter_module(feature.target(), level);
                }
                _ => {
                    return Err(LoggingError::Config(format!(
                        "Unknown logging feature '{}'",
                        feature
                    )))
                }
            }
        }
        builder.write_style(if config.general.enable_colors {
            env_logger::WriteStyle::Auto
        } else {
            env_logger::WriteStyle::Never
        });

        let include_timestamp = config.console.include_timestamp;
        let include_module = config.console.include_module;
        builder.format(move |buf, record| {
            if include_timestamp {
                write!(buf, "{} ", chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"))?;
            }
            if include_module {
                write!(buf, "[{}] ", record.target())?;
            }
            writeln!(buf, "{} {}", record.level(), record.args())
        });

        if !config.console.enabled {
            builder.filter_level(log::LevelFilter::Off);
        }

        LOGGING_CONFIG
            .set(Arc::new(RwLock::new(config)))
            .map_err(|_| LoggingError::AlreadyInitialized)?;

        builder
            .try_init()
            .map_err(|e| LoggingError::Config(e.to_string()))?;

        Ok(())
    }

    /// Get the global logging configuration
    pub fn get_config() -> Option<LogConfig> {
        LOGGING_CONFIG
            .get()
            .and_then(|config| config.read().ok().map(|guard| guard.clone()))
    }

    /// Update the general log level at runtime
    pub fn update_level(level: &str) -> Result<(), LoggingError> {
        let level_filter = parse_level(level)
            .ok_or_else(|| LoggingError::Config(format!("Invalid log level: {}", level)))?;

        let config = LOGGING_CONFIG
            .get()
            .ok_or_else(|| LoggingError::Config("Logging system not initialized".to_string()))?;
        let mut guard = config
            .write()
            .map_err(|_| LoggingError::Config("Logging configuration lock poisoned".to_string()))?;
        guard.general.default_level = level.to_string();
        log::set_max_level(level_filter);
        Ok(())
    }
}

/// Logging system errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Logging system already initialized")]
    AlreadyInitialized,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Config error: {0}")]
    ConfigError(#[from] crate::logging::config::ConfigError),
}
