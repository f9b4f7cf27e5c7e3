//! Application configuration (YAML).
//!
//! Only tunes defaults; store state is never written here.

use std::path::Path;

use ev_core::{ALL_CARRIERS, Resolution};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// File extension the database picker is restricted to.
    pub database_extension: String,
    pub default_resolution: Resolution,
    pub default_carrier: String,
    /// Rows fetched when previewing a table in the raw viewer.
    pub raw_table_row_limit: usize,
    /// `tracing` filter directive used by [`crate::telemetry::init_tracing`].
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_extension: "duckdb".to_string(),
            default_resolution: Resolution::Days,
            default_carrier: ALL_CARRIERS.to_string(),
            raw_table_row_limit: 1000,
            log_filter: "info".to_string(),
        }
    }
}

/// Load configuration from a YAML file. Missing keys take their defaults.
pub fn load_config(path: &Path) -> AppResult<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> AppResult<AppConfig> {
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    serde_yaml::from_str(content)
        .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))
}

/// Save configuration to a YAML file.
pub fn save_config(path: &Path, config: &AppConfig) -> AppResult<()> {
    let content = serde_yaml::to_string(config)
        .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(path, content).map_err(|e| AppError::ConfigWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
