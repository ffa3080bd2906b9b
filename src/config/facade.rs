//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::DriveFoldConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from files and environment.
    pub fn load(workspace_root: &Path) -> Result<DriveFoldConfig, ApiError> {
        Ok(MergeService::load(workspace_root)?)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<DriveFoldConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Ok(MergeService::load_from_file(path)?)
    }

    /// Create default configuration.
    pub fn default() -> DriveFoldConfig {
        DriveFoldConfig::default()
    }
}
