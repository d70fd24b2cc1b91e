//! TOML-file group repository.
//!
//! Layout under the storage root:
//! `<dataroom>/groups/<group>.toml` and `<dataroom>/collaborators.toml`.

use crate::config::StorageConfig;
use crate::error::{ApiError, StorageError};
use crate::group::{ensure_not_in_use, sort_groups, PermissionGroupRepository};
use crate::permission::{Collaborator, PermissionGroup};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CollaboratorFile {
    #[serde(default)]
    collaborators: Vec<Collaborator>,
}

/// Repository persisting groups as TOML files.
pub struct XdgGroupRepository {
    root: PathBuf,
}

impl XdgGroupRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Repository rooted at the configured (or default XDG) groups path.
    pub fn from_config(storage: &StorageConfig) -> Result<Self, ApiError> {
        Ok(Self::new(storage.resolve_groups_path()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dataroom_dir(&self, dataroom_id: &str) -> Result<PathBuf, ApiError> {
        validate_segment(dataroom_id, "dataroom id")?;
        Ok(self.root.join(dataroom_id))
    }

    fn groups_dir(&self, dataroom_id: &str) -> Result<PathBuf, ApiError> {
        Ok(self.dataroom_dir(dataroom_id)?.join("groups"))
    }

    /// Path of a group's TOML file.
    pub fn path_for(&self, dataroom_id: &str, group_id: &str) -> Result<PathBuf, ApiError> {
        validate_segment(group_id, "group id")?;
        Ok(self.groups_dir(dataroom_id)?.join(format!("{}.toml", group_id)))
    }

    fn collaborators_path(&self, dataroom_id: &str) -> Result<PathBuf, ApiError> {
        Ok(self.dataroom_dir(dataroom_id)?.join("collaborators.toml"))
    }

    fn read_collaborators(&self, dataroom_id: &str) -> Result<Vec<Collaborator>, ApiError> {
        let path = self.collaborators_path(dataroom_id)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path).map_err(StorageError::IoError)?;
        let file: CollaboratorFile = toml::from_str(&content).map_err(|e| {
            StorageError::Serialization(format!(
                "Failed to parse collaborators {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(file.collaborators)
    }

    fn write_collaborators(
        &self,
        dataroom_id: &str,
        mut collaborators: Vec<Collaborator>,
    ) -> Result<(), ApiError> {
        collaborators.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        let content = toml::to_string_pretty(&CollaboratorFile { collaborators }).map_err(|e| {
            StorageError::Serialization(format!("Failed to serialize collaborators: {}", e))
        })?;
        write_atomic(&self.collaborators_path(dataroom_id)?, &content)
    }
}

impl PermissionGroupRepository for XdgGroupRepository {
    fn load(&self, dataroom_id: &str) -> Result<Vec<PermissionGroup>, ApiError> {
        let groups_dir = self.groups_dir(dataroom_id)?;
        if !groups_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&groups_dir).map_err(|e| {
            ApiError::StorageError(StorageError::InvalidPath(format!(
                "Failed to read groups directory {}: {}",
                groups_dir.display(),
                e
            )))
        })?;

        let mut loaded = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(
                        "Failed to read directory entry in {}: {}",
                        groups_dir.display(),
                        e
                    );
                    continue;
                }
            };

            let path = entry.path();
            if path.extension() != Some(std::ffi::OsStr::new("toml")) {
                continue;
            }

            let file_stem = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => {
                    tracing::warn!("Invalid group filename non UTF8: {:?}", path);
                    continue;
                }
            };

            let content = match std::fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!("Failed to read group {}: {}", path.display(), e);
                    continue;
                }
            };

            let group: PermissionGroup = match toml::from_str(&content) {
                Ok(group) => group,
                Err(e) => {
                    tracing::error!("Failed to parse group {}: {}", path.display(), e);
                    continue;
                }
            };

            if group.id != file_stem {
                tracing::error!(
                    "Group id mismatch in {}: filename={}, group={}",
                    path.display(),
                    file_stem,
                    group.id
                );
                continue;
            }

            if let Err(e) = group.validate() {
                tracing::error!("Invalid group {}: {}", path.display(), e);
                continue;
            }

            loaded.push(group);
        }

        sort_groups(&mut loaded);
        Ok(loaded)
    }

    fn get(&self, dataroom_id: &str, group_id: &str) -> Result<Option<PermissionGroup>, ApiError> {
        let path = self.path_for(dataroom_id, group_id)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path).map_err(StorageError::IoError)?;
        let group = toml::from_str(&content).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse group {}: {}", path.display(), e))
        })?;
        Ok(Some(group))
    }

    fn save(&self, dataroom_id: &str, group: &PermissionGroup) -> Result<(), ApiError> {
        group.validate()?;
        let path = self.path_for(dataroom_id, &group.id)?;
        let content = toml::to_string_pretty(group).map_err(|e| {
            StorageError::Serialization(format!("Failed to serialize group {}: {}", group.id, e))
        })?;
        write_atomic(&path, &content)
    }

    fn delete(&self, dataroom_id: &str, group_id: &str) -> Result<(), ApiError> {
        let path = self.path_for(dataroom_id, group_id)?;
        if !path.exists() {
            return Err(ApiError::GroupNotFound(group_id.to_string()));
        }
        ensure_not_in_use(&self.read_collaborators(dataroom_id)?, group_id)?;
        std::fs::remove_file(&path).map_err(|e| {
            ApiError::StorageError(StorageError::InvalidPath(format!(
                "Failed to delete group file {}: {}",
                path.display(),
                e
            )))
        })
    }

    fn collaborators(&self, dataroom_id: &str) -> Result<Vec<Collaborator>, ApiError> {
        let mut collaborators = self.read_collaborators(dataroom_id)?;
        collaborators.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(collaborators)
    }

    fn assign(&self, dataroom_id: &str, collaborator: Collaborator) -> Result<(), ApiError> {
        if !self.path_for(dataroom_id, &collaborator.group_id)?.exists() {
            return Err(ApiError::GroupNotFound(collaborator.group_id));
        }
        let mut collaborators = self.read_collaborators(dataroom_id)?;
        collaborators.retain(|c| c.user_id != collaborator.user_id);
        collaborators.push(collaborator);
        self.write_collaborators(dataroom_id, collaborators)
    }

    fn unassign(&self, dataroom_id: &str, user_id: &str) -> Result<bool, ApiError> {
        let mut collaborators = self.read_collaborators(dataroom_id)?;
        let before = collaborators.len();
        collaborators.retain(|c| c.user_id != user_id);
        if collaborators.len() == before {
            return Ok(false);
        }
        self.write_collaborators(dataroom_id, collaborators)?;
        Ok(true)
    }
}

fn validate_segment(value: &str, what: &str) -> Result<(), ApiError> {
    if value.trim().is_empty()
        || value.contains(['/', '\\'])
        || value.starts_with('.')
    {
        return Err(ApiError::StorageError(StorageError::InvalidPath(format!(
            "Invalid {}: {:?}",
            what, value
        ))));
    }
    Ok(())
}

/// Write through a temporary sibling and rename, so readers never see a torn file.
fn write_atomic(path: &Path, content: &str) -> Result<(), ApiError> {
    let parent = path.parent().ok_or_else(|| {
        StorageError::InvalidPath(format!("No parent directory for {}", path.display()))
    })?;
    std::fs::create_dir_all(parent).map_err(|e| {
        StorageError::InvalidPath(format!(
            "Failed to create directory {}: {}",
            parent.display(),
            e
        ))
    })?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, content).map_err(StorageError::IoError)?;
    std::fs::rename(&tmp, path).map_err(StorageError::IoError)?;
    Ok(())
}
