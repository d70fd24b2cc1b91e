//! Configuration
//!
//! Layered configuration: built-in defaults, global file, workspace file and
//! `DATAROOM_*` environment variables (highest precedence).

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod workspace;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use workspace::storage_paths::StorageConfig;

use crate::logging::LoggingConfig;
use crate::permission::ComparableFlags;
use serde::{Deserialize, Serialize};

/// Permission engine settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionsConfig {
    /// File flags compared when detecting deviating files.
    #[serde(default)]
    pub comparable_flags: ComparableFlags,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataroomConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub permissions: PermissionsConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}
