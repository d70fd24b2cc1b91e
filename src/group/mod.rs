//! Permission group persistence: storage port, implementations and the
//! service that serializes writes per dataroom.

pub mod memory;
pub mod service;
pub mod xdg;

use crate::error::ApiError;
use crate::permission::{Collaborator, PermissionGroup};

pub use memory::InMemoryGroupRepository;
pub use service::PermissionGroupService;
pub use xdg::XdgGroupRepository;

/// Storage port for permission groups and collaborator assignments.
pub trait PermissionGroupRepository: Send + Sync {
    /// All groups of a dataroom, sorted by name then id.
    fn load(&self, dataroom_id: &str) -> Result<Vec<PermissionGroup>, ApiError>;

    fn get(&self, dataroom_id: &str, group_id: &str) -> Result<Option<PermissionGroup>, ApiError> {
        Ok(self
            .load(dataroom_id)?
            .into_iter()
            .find(|g| g.id == group_id))
    }

    /// Insert or replace a group.
    fn save(&self, dataroom_id: &str, group: &PermissionGroup) -> Result<(), ApiError>;

    /// Delete a group. Fails with `GroupInUse` while collaborators reference it.
    fn delete(&self, dataroom_id: &str, group_id: &str) -> Result<(), ApiError>;

    /// Collaborators of a dataroom, sorted by user id.
    fn collaborators(&self, dataroom_id: &str) -> Result<Vec<Collaborator>, ApiError>;

    /// Insert or replace a collaborator's group assignment.
    fn assign(&self, dataroom_id: &str, collaborator: Collaborator) -> Result<(), ApiError>;

    /// Remove a collaborator. Returns whether one was removed.
    fn unassign(&self, dataroom_id: &str, user_id: &str) -> Result<bool, ApiError>;
}

/// Fail with `GroupInUse` if any collaborator references `group_id`.
pub(crate) fn ensure_not_in_use(
    collaborators: &[Collaborator],
    group_id: &str,
) -> Result<(), ApiError> {
    let mut users: Vec<String> = collaborators
        .iter()
        .filter(|c| c.group_id == group_id)
        .map(|c| c.user_id.clone())
        .collect();
    if users.is_empty() {
        return Ok(());
    }
    users.sort();
    Err(ApiError::GroupInUse {
        group_id: group_id.to_string(),
        users,
    })
}

pub(crate) fn sort_groups(groups: &mut [PermissionGroup]) {
    groups.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}
