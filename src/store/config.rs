//! Store configuration
//!
//! Loaded from a JSON file:
//!
//! ```json
//! { "data_dir": "./data", "log_level": "info" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::Severity;
use crate::storage::{StoreError, StoreResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the table files (required)
    pub data_dir: PathBuf,

    /// Lowest log severity written (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl StoreConfig {
    /// Configuration with defaults for everything but the data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_level: default_log_level(),
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StoreError::io_failure(format!("failed to read config: {}", path.display()), e)
        })?;

        let config: StoreConfig = serde_json::from_str(&content)
            .map_err(|e| StoreError::invalid_argument(format!("invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> StoreResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(StoreError::invalid_argument("data_dir must not be empty"));
        }
        self.severity()?;
        Ok(())
    }

    /// Parsed log level
    pub fn severity(&self) -> StoreResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            StoreError::invalid_argument(format!(
                "invalid log_level '{}', expected one of trace, info, warn, error, fatal",
                self.log_level
            ))
        })
    }
}
