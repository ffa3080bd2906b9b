//! Workspace config file source: `<workspace>/drivefold.toml`

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::Path;

pub const WORKSPACE_CONFIG_FILE: &str = "drivefold.toml";

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        File::from(workspace_root.join(WORKSPACE_CONFIG_FILE))
            .format(FileFormat::Toml)
            .required(false),
    ))
}
