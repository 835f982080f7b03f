//! Dashboard configuration.

use crate::source::SourceMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key the arrangement is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "dashboardLayout";

/// Number of grid columns.
pub const DEFAULT_COLUMNS: u32 = 12;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings shared by the grid session, the view renderer and storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Key the arrangement is stored under.
    pub storage_key: String,
    /// Grid width in columns.
    pub columns: u32,
    /// Height of one grid row, in pixels.
    pub cell_height: f32,
    /// Gap between cells, in pixels.
    pub margin: f32,
    /// Where widgets get their data from.
    pub data_source: SourceMode,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            columns: DEFAULT_COLUMNS,
            cell_height: 60.0,
            margin: 10.0,
            data_source: SourceMode::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::Invalid("columns must be positive".to_string()));
        }
        if self.storage_key.is_empty() {
            return Err(ConfigError::Invalid("storage key must not be empty".to_string()));
        }
        if self.cell_height.is_nan() || self.cell_height <= 0.0 || self.margin < 0.0 {
            return Err(ConfigError::Invalid(
                "cell height must be positive and margin non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
