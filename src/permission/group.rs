//! Permission groups and the collaborators that reference them.

use crate::error::ApiError;
use crate::permission::record::{PermissionDefaults, PermissionMap};
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Named bundle of access rules assigned to collaborators.
///
/// With `all_access` set (general mode) the defaults govern every item and
/// per-node overrides are ignored. Otherwise (specific mode) overrides keyed by
/// node id apply, falling back to the defaults for unlisted nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub all_access: bool,
    /// Nodes included in the group's scope.
    #[serde(default)]
    pub scope: BTreeSet<NodeId>,
    #[serde(default)]
    pub defaults: PermissionDefaults,
    #[serde(default)]
    pub overrides: PermissionMap,
}

impl PermissionGroup {
    /// New group in specific mode with built-in defaults.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            all_access: false,
            scope: BTreeSet::new(),
            defaults: PermissionDefaults::default(),
            overrides: PermissionMap::new(),
        }
    }

    /// New group in general mode governed by `defaults`.
    pub fn general(
        id: impl Into<String>,
        name: impl Into<String>,
        defaults: PermissionDefaults,
    ) -> Self {
        Self {
            all_access: true,
            defaults,
            ..Self::new(id, name)
        }
    }

    pub fn with_defaults(mut self, defaults: PermissionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.id.trim().is_empty() {
            return Err(ApiError::InvalidGroup("group id cannot be empty".to_string()));
        }
        if self.id.contains(['/', '\\']) || self.id.starts_with('.') {
            return Err(ApiError::InvalidGroup(format!(
                "group id {:?} must not contain path separators or start with '.'",
                self.id
            )));
        }
        if self.name.trim().is_empty() {
            return Err(ApiError::InvalidGroup(format!(
                "group {} has an empty name",
                self.id
            )));
        }
        Ok(())
    }
}

/// A user record referencing a permission group by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaborator {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub group_id: String,
}

impl Collaborator {
    pub fn new(user_id: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            group_id: group_id.into(),
        }
    }
}
