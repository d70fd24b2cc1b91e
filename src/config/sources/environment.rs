//! Environment variable source: DATAROOM_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Environment source shared by every loader.
///
/// `DATAROOM_PERMISSIONS__COMPARABLE_FLAGS=editAccess,addTags` is parsed as a list.
pub fn source() -> Environment {
    Environment::with_prefix("DATAROOM")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("permissions.comparable_flags")
        .try_parsing(true)
}

/// Add environment variable overlay to builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(source()))
}
