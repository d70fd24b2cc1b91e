//! Shared types for workspace operations and command output.

use crate::permission::{FilePermission, FolderPermission};
use crate::tree::NodeMove;
use crate::types::NodeId;
use serde::Serialize;
use std::collections::BTreeSet;

/// What changed between two tree builds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RebuildReport {
    pub added: BTreeSet<NodeId>,
    pub removed: BTreeSet<NodeId>,
    pub moved: Vec<NodeMove>,
}

impl RebuildReport {
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.moved.is_empty()
    }
}

/// One row of the tree listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRow {
    pub numbering: String,
    pub id: NodeId,
    pub name: String,
    pub kind: String,
    pub depth: usize,
    pub customized: bool,
    pub deviates: bool,
    pub in_scope: bool,
}

/// Effective permission of a node, with where it came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ResolvedOutput {
    #[serde(rename_all = "camelCase")]
    File {
        id: NodeId,
        customized: bool,
        /// Folder whose child file standard applies; `None` when customized or in general mode.
        #[serde(skip_serializing_if = "Option::is_none")]
        inherited_from: Option<NodeId>,
        permission: FilePermission,
    },
    #[serde(rename_all = "camelCase")]
    Folder {
        id: NodeId,
        permission: FolderPermission,
    },
}

/// Permission group summary row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: String,
    pub name: String,
    pub all_access: bool,
    pub overrides: usize,
    pub scope: usize,
    pub users: Vec<String>,
}
