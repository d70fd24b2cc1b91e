//! Tree node types and the flat listing records they are built from.

use crate::types::NodeId;
use serde::{Deserialize, Serialize};

/// Node kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    // Folders sort before files.
    Folder,
    File,
}

/// One file or folder in the dataroom hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    /// Normalized path of the containing folder ("" at top level).
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    /// Child ids: folders first, then by name.
    pub children: Vec<NodeId>,
    /// Position label such as "1.2.3"; empty for the root.
    pub numbering: String,
}

impl Node {
    pub(crate) fn folder(id: NodeId, name: String, path: String, parent_id: Option<NodeId>) -> Self {
        Self {
            id,
            name,
            kind: NodeKind::Folder,
            path,
            parent_id,
            children: Vec::new(),
            numbering: String::new(),
        }
    }

    pub(crate) fn file(id: NodeId, name: String, path: String, parent_id: NodeId) -> Self {
        Self {
            id,
            name,
            kind: NodeKind::File,
            path,
            parent_id: Some(parent_id),
            children: Vec::new(),
            numbering: String::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Normalized full path of this node.
    pub fn full_path(&self) -> String {
        join_path(&self.path, &self.name)
    }
}

/// Folder or file record supplied by the listing source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    /// Backend id; derived from `path + name` when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Slash-delimited path of the containing folder, optionally prefixed by "Root".
    #[serde(default)]
    pub full_path: String,
    #[serde(default)]
    pub name: String,
    /// Parent hint from the backend; the path is authoritative.
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl ListingRecord {
    pub fn new(full_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            full_path: full_path.into(),
            name: name.into(),
            parent_id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Backend id if present and non-blank.
    pub fn backend_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

/// Snapshot pulled from the folder/file listing source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub folders: Vec<ListingRecord>,
    #[serde(default)]
    pub files: Vec<ListingRecord>,
}

/// Split a listing path into segments, dropping empty segments and a leading "Root".
pub fn path_segments(full_path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = full_path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.first() == Some(&crate::types::ROOT_SEGMENT) {
        segments.remove(0);
    }
    segments
}

pub(crate) fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", path, name)
    }
}
