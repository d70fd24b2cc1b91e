//! In-memory group repository.

use crate::error::ApiError;
use crate::group::{ensure_not_in_use, sort_groups, PermissionGroupRepository};
use crate::permission::{Collaborator, PermissionGroup};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

#[derive(Default)]
struct Dataroom {
    groups: BTreeMap<String, PermissionGroup>,
    collaborators: BTreeMap<String, Collaborator>,
}

/// Repository keeping everything in process memory.
#[derive(Default)]
pub struct InMemoryGroupRepository {
    datarooms: RwLock<HashMap<String, Dataroom>>,
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PermissionGroupRepository for InMemoryGroupRepository {
    fn load(&self, dataroom_id: &str) -> Result<Vec<PermissionGroup>, ApiError> {
        let datarooms = self.datarooms.read();
        let mut groups: Vec<PermissionGroup> = datarooms
            .get(dataroom_id)
            .map(|room| room.groups.values().cloned().collect())
            .unwrap_or_default();
        sort_groups(&mut groups);
        Ok(groups)
    }

    fn get(&self, dataroom_id: &str, group_id: &str) -> Result<Option<PermissionGroup>, ApiError> {
        Ok(self
            .datarooms
            .read()
            .get(dataroom_id)
            .and_then(|room| room.groups.get(group_id).cloned()))
    }

    fn save(&self, dataroom_id: &str, group: &PermissionGroup) -> Result<(), ApiError> {
        group.validate()?;
        self.datarooms
            .write()
            .entry(dataroom_id.to_string())
            .or_default()
            .groups
            .insert(group.id.clone(), group.clone());
        Ok(())
    }

    fn delete(&self, dataroom_id: &str, group_id: &str) -> Result<(), ApiError> {
        let mut datarooms = self.datarooms.write();
        let room = datarooms
            .get_mut(dataroom_id)
            .filter(|room| room.groups.contains_key(group_id))
            .ok_or_else(|| ApiError::GroupNotFound(group_id.to_string()))?;
        let collaborators: Vec<Collaborator> = room.collaborators.values().cloned().collect();
        ensure_not_in_use(&collaborators, group_id)?;
        room.groups.remove(group_id);
        Ok(())
    }

    fn collaborators(&self, dataroom_id: &str) -> Result<Vec<Collaborator>, ApiError> {
        Ok(self
            .datarooms
            .read()
            .get(dataroom_id)
            .map(|room| room.collaborators.values().cloned().collect())
            .unwrap_or_default())
    }

    fn assign(&self, dataroom_id: &str, collaborator: Collaborator) -> Result<(), ApiError> {
        let mut datarooms = self.datarooms.write();
        let room = datarooms.entry(dataroom_id.to_string()).or_default();
        if !room.groups.contains_key(&collaborator.group_id) {
            return Err(ApiError::GroupNotFound(collaborator.group_id));
        }
        room.collaborators
            .insert(collaborator.user_id.clone(), collaborator);
        Ok(())
    }

    fn unassign(&self, dataroom_id: &str, user_id: &str) -> Result<bool, ApiError> {
        Ok(self
            .datarooms
            .write()
            .get_mut(dataroom_id)
            .map(|room| room.collaborators.remove(user_id).is_some())
            .unwrap_or(false))
    }
}
