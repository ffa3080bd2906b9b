//! Configuration
//!
//! Layered configuration (defaults, global file, workspace file, environment)
//! deserialized into [`DriveFoldConfig`], plus credential resolution.

pub mod credentials;
pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod workspace;

pub use credentials::{load_secret_value, SecretStore};
pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use workspace::secrets_path::CredentialSettings;

use crate::logging::LoggingConfig;
use crate::tree::RootPolicy;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriveFoldConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub drive: DriveSettings,

    #[serde(default)]
    pub tree: TreeSettings,

    #[serde(default)]
    pub credentials: CredentialSettings,
}

/// Drive API transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveSettings {
    /// Base URL of the Drive v3 REST API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Entries requested per listing page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Longest side requested for image thumbnails when the size is unknown
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,
}

fn default_api_base() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

fn default_page_size() -> u32 {
    1000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_thumbnail_size() -> u32 {
    1600
}

impl Default for DriveSettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            thumbnail_size: default_thumbnail_size(),
        }
    }
}

/// Tree building settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeSettings {
    #[serde(default)]
    pub root_policy: RootPolicy,
}
