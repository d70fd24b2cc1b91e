//! PermissionWorkspace: owned editing state for one permission group.

use crate::deviation::{deviation_report, find_deviators, Deviation};
use crate::error::ApiError;
use crate::permission::{
    ComparableFlags, FileFlag, FilePermission, FilePermissionRecord, FolderFlag,
    FolderPermission, PermissionGroup, PermissionRecord,
};
use crate::resolver::{resolve_group_file, resolve_group_folder};
use crate::tree::{build_from_listing, Listing, Node, TreeIndex};
use crate::types::{NodeId, ROOT_ID};
use crate::visibility::set_visibility;
use crate::workspace::types::{RebuildReport, ResolvedOutput, TreeRow};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Tree, permission group and selection for one editing session.
///
/// All derived state (resolved permissions, deviators) is computed on demand
/// from these three values; nothing is cached.
#[derive(Debug, Clone)]
pub struct PermissionWorkspace {
    tree: TreeIndex,
    group: PermissionGroup,
    comparable: ComparableFlags,
}

impl PermissionWorkspace {
    /// Records stored under an id whose node now has the other kind are
    /// dropped; records for ids missing from `tree` are kept until a rebuild.
    pub fn new(tree: TreeIndex, mut group: PermissionGroup) -> Self {
        group
            .overrides
            .retain(|id, record| record_matches_node(&tree, id, record).unwrap_or(true));
        Self {
            tree,
            group,
            comparable: ComparableFlags::default(),
        }
    }

    pub fn from_listing(listing: &Listing, group: PermissionGroup) -> Self {
        Self::new(build_from_listing(listing), group)
    }

    pub fn with_comparable_flags(mut self, comparable: ComparableFlags) -> Self {
        self.comparable = comparable;
        self
    }

    pub fn tree(&self) -> &TreeIndex {
        &self.tree
    }

    pub fn group(&self) -> &PermissionGroup {
        &self.group
    }

    pub fn into_group(self) -> PermissionGroup {
        self.group
    }

    pub fn selection(&self) -> &BTreeSet<NodeId> {
        &self.group.scope
    }

    pub fn comparable_flags(&self) -> &ComparableFlags {
        &self.comparable
    }

    /// Replace the tree from a fresh listing.
    ///
    /// Records and selections for ids that no longer exist are dropped, as are
    /// records whose kind no longer matches the node (a file that became a folder).
    pub fn rebuild(&mut self, listing: &Listing) -> RebuildReport {
        let tree = build_from_listing(listing);
        let report = RebuildReport {
            added: tree.added_since(&self.tree),
            removed: tree.removed_since(&self.tree),
            moved: tree.moves_since(&self.tree),
        };
        for moved in &report.moved {
            debug!(node_id = %moved.id, from = ?moved.from, to = ?moved.to, "Node moved");
        }

        let before = self.group.overrides.len();
        self.group
            .overrides
            .retain(|id, record| record_matches_node(&tree, id, record).unwrap_or(false));
        let dropped = before - self.group.overrides.len();
        if dropped > 0 {
            info!(dropped, "Dropped stale permission records");
        }
        self.group.scope.retain(|id| tree.contains(id));
        self.tree = tree;
        report
    }

    pub fn resolve_file(&self, file_id: &str) -> Result<FilePermission, ApiError> {
        self.file_node(file_id)?;
        Ok(resolve_group_file(&self.group, file_id, self.tree.parent_map()))
    }

    pub fn resolve_folder(&self, folder_id: &str) -> Result<FolderPermission, ApiError> {
        self.folder_node(folder_id)?;
        Ok(resolve_group_folder(&self.group, folder_id))
    }

    pub fn is_customized(&self, file_id: &str) -> bool {
        self.group
            .overrides
            .file(file_id)
            .map(|r| r.is_customized)
            .unwrap_or(false)
    }

    /// Edit one flag of a file. Any edit marks the file customized, starting
    /// from its currently resolved values.
    pub fn edit_file_flag(
        &mut self,
        file_id: &str,
        flag: FileFlag,
        value: bool,
    ) -> Result<FilePermission, ApiError> {
        self.require_specific_mode()?;
        let mut current = self.resolve_file(file_id)?;
        current.set(flag, value);
        self.group
            .overrides
            .insert_file(file_id, FilePermissionRecord::customized(&current));
        debug!(node_id = %file_id, %flag, value, "File flag edited");
        Ok(current)
    }

    /// Mark a file customized without changing its effective values.
    pub fn customize_file(&mut self, file_id: &str) -> Result<FilePermission, ApiError> {
        self.require_specific_mode()?;
        let current = self.resolve_file(file_id)?;
        self.group
            .overrides
            .insert_file(file_id, FilePermissionRecord::customized(&current));
        Ok(current)
    }

    /// Reset a file to its folder's child file standard.
    ///
    /// Clears the customized marker and copies the template onto the record.
    /// Later template edits still flow through because resolution of a
    /// non-customized file reads the live ancestor.
    pub fn reset_to_folder_default(&mut self, file_id: &str) -> Result<FilePermission, ApiError> {
        self.require_specific_mode()?;
        let parent = self
            .file_node(file_id)?
            .parent_id
            .clone()
            .unwrap_or_else(|| ROOT_ID.to_string());
        let template = resolve_group_folder(&self.group, &parent).child_file_perms;
        self.group.overrides.insert_file(
            file_id,
            FilePermissionRecord {
                is_customized: false,
                overrides: crate::permission::FileOverrides::pinned(&template),
            },
        );
        debug!(node_id = %file_id, parent = %parent, "File reset to folder default");
        Ok(template)
    }

    pub fn edit_folder_flag(
        &mut self,
        folder_id: &str,
        flag: FolderFlag,
        value: bool,
    ) -> Result<FolderPermission, ApiError> {
        self.require_specific_mode()?;
        self.folder_node(folder_id)?;
        self.group
            .overrides
            .folder_mut(folder_id)?
            .overrides
            .set(flag, Some(value));
        self.resolve_folder(folder_id)
    }

    /// Edit one flag of a folder's child file standard.
    pub fn edit_child_file_flag(
        &mut self,
        folder_id: &str,
        flag: FileFlag,
        value: bool,
    ) -> Result<FolderPermission, ApiError> {
        self.require_specific_mode()?;
        self.folder_node(folder_id)?;
        self.group
            .overrides
            .folder_mut(folder_id)?
            .child_file_perms
            .set(flag, Some(value));
        self.resolve_folder(folder_id)
    }

    /// Edit the group-wide default file permission.
    pub fn edit_default_file_flag(&mut self, flag: FileFlag, value: bool) -> FilePermission {
        self.group.defaults.file.set(flag, value);
        self.group.defaults.file
    }

    /// Edit the group-wide default folder permission.
    pub fn edit_default_folder_flag(&mut self, flag: FolderFlag, value: bool) -> FolderPermission {
        self.group.defaults.folder.set(flag, value);
        self.group.defaults.folder
    }

    /// Switch between general (`true`) and specific (`false`) mode.
    ///
    /// Overrides are kept so that switching back restores them.
    pub fn set_all_access(&mut self, all_access: bool) {
        self.group.all_access = all_access;
    }

    /// Deviating files; empty in general mode where overrides do not apply.
    pub fn deviators(&self) -> BTreeSet<NodeId> {
        if self.group.all_access {
            return BTreeSet::new();
        }
        find_deviators(
            &self.tree,
            &self.group.overrides,
            &self.group.defaults,
            &self.comparable,
        )
    }

    pub fn deviation_report(&self) -> Vec<Deviation> {
        if self.group.all_access {
            return Vec::new();
        }
        deviation_report(
            &self.tree,
            &self.group.overrides,
            &self.group.defaults,
            &self.comparable,
        )
    }

    /// Toggle a node's inclusion in the group scope.
    pub fn set_visibility(
        &mut self,
        node_id: &str,
        visible: bool,
    ) -> Result<&BTreeSet<NodeId>, ApiError> {
        if !self.tree.contains(node_id) {
            return Err(ApiError::NodeNotFound(node_id.to_string()));
        }
        self.group.scope = set_visibility(&self.tree, node_id, visible, &self.group.scope);
        Ok(&self.group.scope)
    }

    /// Tree rows in display order, annotated with derived state.
    pub fn tree_rows(&self) -> Vec<TreeRow> {
        let deviators = self.deviators();
        self.tree
            .walk()
            .into_iter()
            .map(|node| TreeRow {
                numbering: node.numbering.clone(),
                id: node.id.clone(),
                name: node.name.clone(),
                kind: if node.is_folder() { "folder" } else { "file" }.to_string(),
                depth: self.tree.ancestors(&node.id).len().saturating_sub(1),
                customized: node.is_file() && self.is_customized(&node.id),
                deviates: deviators.contains(&node.id),
                in_scope: self.group.scope.contains(&node.id),
            })
            .collect()
    }

    /// Effective permission of any node, with its inheritance source.
    pub fn describe(&self, node_id: &str) -> Result<ResolvedOutput, ApiError> {
        let node = self
            .tree
            .get(node_id)
            .filter(|n| n.id != ROOT_ID)
            .ok_or_else(|| ApiError::NodeNotFound(node_id.to_string()))?;
        if node.is_folder() {
            return Ok(ResolvedOutput::Folder {
                id: node.id.clone(),
                permission: self.resolve_folder(node_id)?,
            });
        }
        let customized = self.is_customized(node_id);
        let inherited_from = if customized || self.group.all_access {
            None
        } else {
            Some(
                node.parent_id
                    .clone()
                    .unwrap_or_else(|| ROOT_ID.to_string()),
            )
        };
        Ok(ResolvedOutput::File {
            id: node.id.clone(),
            customized,
            inherited_from,
            permission: self.resolve_file(node_id)?,
        })
    }

    fn require_specific_mode(&self) -> Result<(), ApiError> {
        if self.group.all_access {
            return Err(ApiError::GeneralAccessMode(self.group.id.clone()));
        }
        Ok(())
    }

    fn file_node(&self, id: &str) -> Result<&Node, ApiError> {
        let node = self
            .tree
            .get(id)
            .ok_or_else(|| ApiError::NodeNotFound(id.to_string()))?;
        if !node.is_file() {
            return Err(ApiError::WrongNodeKind {
                id: id.to_string(),
                expected: "file",
            });
        }
        Ok(node)
    }

    fn folder_node(&self, id: &str) -> Result<&Node, ApiError> {
        let node = self
            .tree
            .get(id)
            .ok_or_else(|| ApiError::NodeNotFound(id.to_string()))?;
        if !node.is_folder() {
            return Err(ApiError::WrongNodeKind {
                id: id.to_string(),
                expected: "folder",
            });
        }
        Ok(node)
    }
}

/// Whether a stored record has the same kind as its node; `None` if the node is gone.
fn record_matches_node(tree: &TreeIndex, id: &str, record: &PermissionRecord) -> Option<bool> {
    let node = tree.get(id)?;
    let same_kind = match record {
        PermissionRecord::File(_) => node.is_file(),
        PermissionRecord::Folder(_) => node.is_folder(),
    };
    if !same_kind {
        debug!(node_id = %id, "Dropping record that no longer matches node kind");
    }
    Some(same_kind)
}
