//! MergeService: orchestrates sources, applies merge policy, deserializes to DataroomConfig.

use crate::config::sources::{environment, global_file, workspace_file};
use crate::config::DataroomConfig;
use config::ConfigError;
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from workspace and standard sources.
    /// Precedence: global file (lowest) -> workspace file -> environment (highest).
    pub fn load(workspace_root: &Path) -> Result<DataroomConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<DataroomConfig, ConfigError> {
        use config::File;

        let name = path
            .to_str()
            .ok_or_else(|| ConfigError::Message(format!("Config path is not UTF-8: {:?}", path)))?;
        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(File::with_name(name));
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
