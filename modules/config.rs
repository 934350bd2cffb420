//! Start-up configuration.
//!
//! Built once by the host and passed into every job; the engine never reads
//! configuration on its own.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use super::error::{BulkError, Result};
use super::sync_scanner::SyncWord;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_FRAME_SIZE_BYTES: usize = 1111;
pub const DEFAULT_BULK_SIZE_GB: f64 = 2.0;
pub const DEFAULT_SYNC_WORD_HEX: &str = "4711";

/// Default values for a splitting run. Keys missing from the file keep their
/// hardcoded default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub default_frame_size_bytes: usize,
    pub default_bulk_size_gb: f64,
    pub default_sync_word_hex: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_frame_size_bytes: DEFAULT_FRAME_SIZE_BYTES,
            default_bulk_size_gb: DEFAULT_BULK_SIZE_GB,
            default_sync_word_hex: DEFAULT_SYNC_WORD_HEX.to_string(),
        }
    }
}

impl AppConfig {
    /// Read and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| config_error(path, e.to_string()))?;
        let config: AppConfig = serde_json::from_str(&raw).map_err(|e| config_error(path, e.to_string()))?;
        config.validate().map_err(|reason| config_error(path, reason))?;
        Ok(config)
    }

    /// Like [`AppConfig::load`], but any failure is logged and the hardcoded
    /// defaults are returned instead.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{}. Using hardcoded defaults.", e);
                Self::default()
            }
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.default_frame_size_bytes == 0 {
            return Err("default_frame_size_bytes must be positive".into());
        }
        if !self.default_bulk_size_gb.is_finite() || self.default_bulk_size_gb <= 0.0 {
            return Err("default_bulk_size_gb must be a positive number".into());
        }
        SyncWord::from_hex(&self.default_sync_word_hex)
            .map_err(|_| format!("default_sync_word_hex {:?} is not valid hex", self.default_sync_word_hex))?;
        Ok(())
    }
}

fn config_error(path: &Path, reason: String) -> BulkError {
    BulkError::Config {
        path: path.to_path_buf(),
        reason,
    }
}
