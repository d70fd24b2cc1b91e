//! StorageConfig: where permission groups live on disk.

use crate::config::xdg;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for group files; None means the XDG data default.
    #[serde(default)]
    pub groups_path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn with_groups_path(path: impl Into<PathBuf>) -> Self {
        Self {
            groups_path: Some(path.into()),
        }
    }

    /// Resolve the group storage root.
    pub fn resolve_groups_path(&self) -> Result<PathBuf, ApiError> {
        match &self.groups_path {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
            _ => xdg::groups_dir(),
        }
    }

    /// Resolve the group storage root, anchoring relative paths at `workspace_root`.
    pub fn resolve_groups_path_in(&self, workspace_root: &Path) -> Result<PathBuf, ApiError> {
        let path = self.resolve_groups_path()?;
        if path.is_relative() {
            Ok(workspace_root.join(path))
        } else {
            Ok(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let config = StorageConfig::with_groups_path("/srv/acl");
        assert_eq!(config.resolve_groups_path().unwrap(), PathBuf::from("/srv/acl"));
    }

    #[test]
    fn relative_path_is_anchored_at_workspace() {
        let config = StorageConfig::with_groups_path("acl");
        assert_eq!(
            config.resolve_groups_path_in(Path::new("/work")).unwrap(),
            PathBuf::from("/work/acl")
        );
    }

    #[test]
    fn empty_path_falls_back_to_default() {
        let config = StorageConfig::with_groups_path("");
        if let Ok(path) = config.resolve_groups_path() {
            assert!(path.ends_with("dataroom/datarooms"));
        }
    }
}
