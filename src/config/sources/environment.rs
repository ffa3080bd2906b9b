//! Environment variable source: DRIVEFOLD_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "DRIVEFOLD";

/// Add environment variable overlay to builder.
/// `DRIVEFOLD__DRIVE__PAGE_SIZE=200` sets `drive.page_size`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(source()))
}

pub(crate) fn source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
