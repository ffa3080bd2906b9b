//! Merge policy: builder seeded with built-in defaults (lowest precedence).

use crate::config::DriveFoldConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Start a builder whose first layer is `DriveFoldConfig::default()`.
/// Later sources override individual keys; tables merge key by key.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = Config::try_from(&DriveFoldConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}
