//! PermissionGroupService: repository access with per-dataroom write serialization.

use crate::concurrency::DataroomLockManager;
use crate::error::ApiError;
use crate::group::PermissionGroupRepository;
use crate::permission::{Collaborator, PermissionGroup};
use crate::workspace::GroupSummary;
use std::sync::Arc;
use tracing::info;

/// Front door for loading, saving and deleting permission groups.
///
/// Writes for one dataroom run one at a time; a failed write returns the error
/// and leaves the caller's in-memory state alone.
pub struct PermissionGroupService {
    repository: Arc<dyn PermissionGroupRepository>,
    locks: DataroomLockManager,
}

impl PermissionGroupService {
    pub fn new(repository: Arc<dyn PermissionGroupRepository>) -> Self {
        Self {
            repository,
            locks: DataroomLockManager::new(),
        }
    }

    pub fn load(&self, dataroom_id: &str) -> Result<Vec<PermissionGroup>, ApiError> {
        self.locks
            .with_read(dataroom_id, || self.repository.load(dataroom_id))
    }

    pub fn get(&self, dataroom_id: &str, group_id: &str) -> Result<PermissionGroup, ApiError> {
        self.locks
            .with_read(dataroom_id, || self.repository.get(dataroom_id, group_id))?
            .ok_or_else(|| ApiError::GroupNotFound(group_id.to_string()))
    }

    pub fn save(&self, dataroom_id: &str, group: &PermissionGroup) -> Result<(), ApiError> {
        group.validate()?;
        self.locks
            .with_write(dataroom_id, || self.repository.save(dataroom_id, group))?;
        info!(dataroom = %dataroom_id, group = %group.id, "Saved permission group");
        Ok(())
    }

    /// Create a group; fails if the id is taken.
    pub fn create(&self, dataroom_id: &str, group: &PermissionGroup) -> Result<(), ApiError> {
        group.validate()?;
        self.locks.with_write(dataroom_id, || {
            if self.repository.get(dataroom_id, &group.id)?.is_some() {
                return Err(ApiError::InvalidGroup(format!(
                    "group {} already exists",
                    group.id
                )));
            }
            self.repository.save(dataroom_id, group)
        })?;
        info!(dataroom = %dataroom_id, group = %group.id, "Created permission group");
        Ok(())
    }

    pub fn delete(&self, dataroom_id: &str, group_id: &str) -> Result<(), ApiError> {
        self.locks
            .with_write(dataroom_id, || self.repository.delete(dataroom_id, group_id))?;
        info!(dataroom = %dataroom_id, group = %group_id, "Deleted permission group");
        Ok(())
    }

    pub fn collaborators(&self, dataroom_id: &str) -> Result<Vec<Collaborator>, ApiError> {
        self.locks
            .with_read(dataroom_id, || self.repository.collaborators(dataroom_id))
    }

    pub fn assign(&self, dataroom_id: &str, collaborator: Collaborator) -> Result<(), ApiError> {
        let user = collaborator.user_id.clone();
        let group = collaborator.group_id.clone();
        if user.trim().is_empty() {
            return Err(ApiError::InvalidGroup("user id cannot be empty".to_string()));
        }
        self.locks
            .with_write(dataroom_id, || self.repository.assign(dataroom_id, collaborator))?;
        info!(dataroom = %dataroom_id, user = %user, group = %group, "Assigned collaborator");
        Ok(())
    }

    pub fn unassign(&self, dataroom_id: &str, user_id: &str) -> Result<bool, ApiError> {
        self.locks
            .with_write(dataroom_id, || self.repository.unassign(dataroom_id, user_id))
    }

    /// Groups with their assigned users.
    pub fn summaries(&self, dataroom_id: &str) -> Result<Vec<GroupSummary>, ApiError> {
        let (groups, collaborators) = self.locks.with_read(dataroom_id, || {
            Ok::<_, ApiError>((
                self.repository.load(dataroom_id)?,
                self.repository.collaborators(dataroom_id)?,
            ))
        })?;
        Ok(groups
            .into_iter()
            .map(|g| GroupSummary {
                users: collaborators
                    .iter()
                    .filter(|c| c.group_id == g.id)
                    .map(|c| c.user_id.clone())
                    .collect(),
                overrides: g.overrides.len(),
                scope: g.scope.len(),
                id: g.id,
                name: g.name,
                all_access: g.all_access,
            })
            .collect())
    }
}
