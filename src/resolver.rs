//! Inheritance Resolver
//!
//! Computes effective permissions for a node from the stored permission map.
//! Resolution always reads live ancestor state and always yields a complete
//! record; lookup misses fall back to the default templates.
//!
//! - A customized file uses its own stored flags, merged over the default file template.
//! - A non-customized file inherits the child file standard of the folder that
//!   contains it. Its own stored flags are ignored while inheriting.
//! - A folder uses its own stored flags. Folders never inherit from a grandparent.

use crate::permission::{
    FilePermission, FolderPermission, PermissionDefaults, PermissionGroup, PermissionMap,
};
use crate::tree::ParentMap;
use tracing::trace;

/// Effective permission of a file.
pub fn resolve_file_permission(
    file_id: &str,
    permissions: &PermissionMap,
    parent_map: &ParentMap,
    defaults: &PermissionDefaults,
) -> FilePermission {
    if let Some(record) = permissions.file(file_id) {
        if record.is_customized {
            return record.overrides.merge_over(&defaults.file);
        }
    }
    match parent_folder(file_id, parent_map) {
        Some(folder_id) => {
            resolve_folder_permission(folder_id, permissions, defaults).child_file_perms
        }
        None => {
            trace!(node_id = %file_id, "No parent folder, using default child file standard");
            defaults.folder.child_file_perms
        }
    }
}

/// Effective permission of a folder.
pub fn resolve_folder_permission(
    folder_id: &str,
    permissions: &PermissionMap,
    defaults: &PermissionDefaults,
) -> FolderPermission {
    match permissions.folder(folder_id) {
        Some(record) => record.merge_over(&defaults.folder),
        None => defaults.folder,
    }
}

/// Mode-aware file resolution for a permission group.
pub fn resolve_group_file(
    group: &PermissionGroup,
    file_id: &str,
    parent_map: &ParentMap,
) -> FilePermission {
    if group.all_access {
        return group.defaults.file;
    }
    resolve_file_permission(file_id, &group.overrides, parent_map, &group.defaults)
}

/// Mode-aware folder resolution for a permission group.
pub fn resolve_group_folder(group: &PermissionGroup, folder_id: &str) -> FolderPermission {
    if group.all_access {
        return group.defaults.folder;
    }
    resolve_folder_permission(folder_id, &group.overrides, &group.defaults)
}

/// Containing folder of a node, taken from the tree structure.
///
/// Parents in a built tree are always folders; the permission map is never
/// consulted, so a stale record cannot redirect inheritance.
fn parent_folder<'a>(node_id: &str, parent_map: &'a ParentMap) -> Option<&'a str> {
    parent_map.get(node_id).and_then(|parent| parent.as_deref())
}
