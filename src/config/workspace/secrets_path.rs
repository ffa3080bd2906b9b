//! CredentialSettings and resolution of the local secrets file.

use crate::config::xdg;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_secrets_file() -> PathBuf {
    PathBuf::from("secrets.toml")
}

fn default_section() -> String {
    "gcp_service_account".to_string()
}

fn default_injected_env() -> String {
    "DRIVEFOLD_SECRETS".to_string()
}

/// Where credentials come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialSettings {
    /// Local secrets file (relative to workspace root); consulted first
    #[serde(default = "default_secrets_file")]
    pub secrets_file: PathBuf,

    /// Table holding the service-account key in either source
    #[serde(default = "default_section")]
    pub section: String,

    /// Environment variable carrying injected secrets as a TOML document
    #[serde(default = "default_injected_env")]
    pub injected_env: String,
}

impl CredentialSettings {
    /// Resolve the local secrets file.
    ///
    /// A relative path is taken from the workspace root. With the default
    /// name, a missing workspace file falls back to the global config dir.
    pub fn resolve_secrets_path(&self, workspace_root: &Path) -> Result<PathBuf, ApiError> {
        if self.secrets_file.is_absolute() {
            return Ok(self.secrets_file.clone());
        }
        let in_workspace = workspace_root.join(&self.secrets_file);
        if in_workspace.exists() || self.secrets_file != default_secrets_file() {
            return Ok(in_workspace);
        }
        match xdg::global_secrets_path() {
            Ok(global) if global.exists() => Ok(global),
            _ => Ok(in_workspace),
        }
    }
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            secrets_file: default_secrets_file(),
            section: default_section(),
            injected_env: default_injected_env(),
        }
    }
}
