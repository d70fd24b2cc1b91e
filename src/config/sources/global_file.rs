//! Global config file: $XDG_CONFIG_HOME/dataroom/config.toml

use crate::config::xdg;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};

/// Add the global config file if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let Ok(path) = xdg::global_config_path() else {
        return Ok(builder);
    };
    if !path.exists() {
        return Ok(builder);
    }
    let Some(name) = path.to_str() else {
        tracing::warn!("Global config path is not UTF-8: {:?}", path);
        return Ok(builder);
    };
    Ok(builder.add_source(File::new(name, FileFormat::Toml).required(false)))
}
