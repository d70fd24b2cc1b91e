//! Workspace config file: <workspace>/dataroom.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::{Path, PathBuf};

pub const WORKSPACE_CONFIG_FILE: &str = "dataroom.toml";

pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_CONFIG_FILE)
}

/// Add the workspace config file if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = workspace_config_path(workspace_root);
    if !path.exists() {
        return Ok(builder);
    }
    let name = path
        .to_str()
        .ok_or_else(|| ConfigError::Message(format!("Config path is not UTF-8: {:?}", path)))?;
    Ok(builder.add_source(File::new(name, FileFormat::Toml).required(false)))
}
