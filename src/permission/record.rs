//! Stored permission records and the permission map keyed by node id.

use crate::error::ApiError;
use crate::permission::flags::{
    FileOverrides, FilePermission, FolderAccess, FolderOverrides, FolderPermission,
};
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Permission record authored for a single file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePermissionRecord {
    #[serde(default)]
    pub is_customized: bool,
    #[serde(default)]
    pub overrides: FileOverrides,
}

impl FilePermissionRecord {
    /// Customized record pinning every flag to `perms`.
    pub fn customized(perms: &FilePermission) -> Self {
        Self {
            is_customized: true,
            overrides: FileOverrides::pinned(perms),
        }
    }
}

/// Permission record authored for a folder, including its child file standard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderPermissionRecord {
    #[serde(default)]
    pub overrides: FolderOverrides,
    #[serde(default)]
    pub child_file_perms: FileOverrides,
}

impl FolderPermissionRecord {
    /// Merge this record over a complete default folder permission.
    pub fn merge_over(&self, base: &FolderPermission) -> FolderPermission {
        FolderPermission {
            access: self.overrides.merge_over(&base.access),
            child_file_perms: self.child_file_perms.merge_over(&base.child_file_perms),
        }
    }
}

/// One stored record; the tag keeps file and folder records apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PermissionRecord {
    File(FilePermissionRecord),
    Folder(FolderPermissionRecord),
}

/// Per-node permission records.
///
/// Ordered so that serialized groups are stable across saves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMap {
    records: BTreeMap<NodeId, PermissionRecord>,
}

impl PermissionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&PermissionRecord> {
        self.records.get(id)
    }

    pub fn file(&self, id: &str) -> Option<&FilePermissionRecord> {
        match self.records.get(id) {
            Some(PermissionRecord::File(record)) => Some(record),
            _ => None,
        }
    }

    pub fn folder(&self, id: &str) -> Option<&FolderPermissionRecord> {
        match self.records.get(id) {
            Some(PermissionRecord::Folder(record)) => Some(record),
            _ => None,
        }
    }

    pub fn insert_file(&mut self, id: impl Into<NodeId>, record: FilePermissionRecord) {
        self.records.insert(id.into(), PermissionRecord::File(record));
    }

    pub fn insert_folder(&mut self, id: impl Into<NodeId>, record: FolderPermissionRecord) {
        self.records
            .insert(id.into(), PermissionRecord::Folder(record));
    }

    /// Mutable file record, created empty if absent.
    ///
    /// Fails with `WrongNodeKind` if the id already holds a folder record.
    pub fn file_mut(&mut self, id: &str) -> Result<&mut FilePermissionRecord, ApiError> {
        match self
            .records
            .entry(id.to_string())
            .or_insert(PermissionRecord::File(FilePermissionRecord::default()))
        {
            PermissionRecord::File(record) => Ok(record),
            PermissionRecord::Folder(_) => Err(ApiError::WrongNodeKind {
                id: id.to_string(),
                expected: "file",
            }),
        }
    }

    /// Mutable folder record, created empty if absent.
    ///
    /// Fails with `WrongNodeKind` if the id already holds a file record.
    pub fn folder_mut(&mut self, id: &str) -> Result<&mut FolderPermissionRecord, ApiError> {
        match self
            .records
            .entry(id.to_string())
            .or_insert(PermissionRecord::Folder(FolderPermissionRecord::default()))
        {
            PermissionRecord::Folder(record) => Ok(record),
            PermissionRecord::File(_) => Err(ApiError::WrongNodeKind {
                id: id.to_string(),
                expected: "folder",
            }),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<PermissionRecord> {
        self.records.remove(id)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &PermissionRecord) -> bool) {
        self.records.retain(|id, record| keep(id, record));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &PermissionRecord)> {
        self.records.iter()
    }
}

/// Complete templates that every partial record is merged over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDefaults {
    #[serde(default)]
    pub file: FilePermission,
    #[serde(default)]
    pub folder: FolderPermission,
}

impl PermissionDefaults {
    pub fn new(file: FilePermission, folder: FolderPermission) -> Self {
        Self { file, folder }
    }

    /// Full access to everything; used for general-mode owner groups.
    pub fn full_access() -> Self {
        Self {
            file: FilePermission::uniform(true),
            folder: FolderPermission {
                access: FolderAccess::uniform(true),
                child_file_perms: FilePermission::uniform(true),
            },
        }
    }
}
