//! Tree construction from flat folder/file listings.
//!
//! Paths are walked segment by segment, creating intermediate folders on
//! demand. Output is fully determined by the input records: ids, child order
//! and numbering do not depend on hash iteration order.

use crate::tree::index::TreeIndex;
use crate::tree::node::{join_path, path_segments, Listing, ListingRecord, Node, NodeKind};
use crate::types::{NodeId, ROOT_ID};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Build a tree from folder and file records.
pub fn build_tree(folders: &[ListingRecord], files: &[ListingRecord]) -> TreeIndex {
    let mut builder = TreeBuilder::new(folders);
    for record in folders {
        builder.add_folder(record);
    }
    for record in files {
        builder.add_file(record);
    }
    builder.finish()
}

/// Build a tree from a listing snapshot.
pub fn build_from_listing(listing: &Listing) -> TreeIndex {
    build_tree(&listing.folders, &listing.files)
}

/// Incremental tree builder.
pub struct TreeBuilder {
    tree: TreeIndex,
    /// normalized folder path -> node id
    folder_ids: HashMap<String, NodeId>,
    /// normalized folder path -> backend id announced by a folder record
    backend_folder_ids: HashMap<String, NodeId>,
}

impl TreeBuilder {
    /// Create a builder, collecting backend folder ids up front so that a
    /// folder first reached as an intermediate segment still gets its backend id.
    pub fn new(folders: &[ListingRecord]) -> Self {
        let mut backend_folder_ids = HashMap::new();
        for record in folders {
            let Some(id) = record.backend_id() else {
                continue;
            };
            if record.name.trim().is_empty() {
                continue;
            }
            let mut segments = path_segments(&record.full_path);
            segments.push(record.name.as_str());
            let path = segments.join("/");
            if let Some(existing) = backend_folder_ids.get(&path) {
                if existing != id {
                    warn!(path = %path, kept = %existing, ignored = %id, "Conflicting folder ids for path");
                }
                continue;
            }
            backend_folder_ids.insert(path, id.to_string());
        }

        let mut folder_ids = HashMap::new();
        folder_ids.insert(String::new(), ROOT_ID.to_string());

        Self {
            tree: TreeIndex::empty(),
            folder_ids,
            backend_folder_ids,
        }
    }

    /// Materialize a folder record and every missing folder on its path.
    pub fn add_folder(&mut self, record: &ListingRecord) -> NodeId {
        let mut segments = path_segments(&record.full_path);
        if !record.name.trim().is_empty() {
            segments.push(record.name.as_str());
        }
        let id = self.ensure_folder(&segments);
        self.check_parent_hint(record, &id);
        id
    }

    /// Attach a file record. Returns `None` when the record was skipped.
    pub fn add_file(&mut self, record: &ListingRecord) -> Option<NodeId> {
        if record.name.trim().is_empty() {
            warn!(path = %record.full_path, "Skipping file with empty name");
            return None;
        }
        let segments = path_segments(&record.full_path);
        let parent_id = self.ensure_folder(&segments);
        let path = segments.join("/");
        let id = record
            .backend_id()
            .map(str::to_string)
            .unwrap_or_else(|| join_path(&path, &record.name));

        let node = Node::file(id.clone(), record.name.clone(), path, parent_id.clone());
        if !self.insert_child(&parent_id, node) {
            return None;
        }
        self.check_parent_hint(record, &id);
        Some(id)
    }

    /// Sort every level and assign numbering.
    pub fn finish(mut self) -> TreeIndex {
        let mut stack = vec![ROOT_ID.to_string()];
        while let Some(id) = stack.pop() {
            let (mut children, numbering) = match self.tree.items.get(&id) {
                Some(node) => (node.children.clone(), node.numbering.clone()),
                None => continue,
            };
            {
                let items = &self.tree.items;
                children.sort_by_key(|child| {
                    items
                        .get(child)
                        .map(|n| (n.kind, n.name.clone(), n.id.clone()))
                });
            }
            for (position, child) in children.iter().enumerate() {
                if let Some(node) = self.tree.items.get_mut(child) {
                    node.numbering = if numbering.is_empty() {
                        (position + 1).to_string()
                    } else {
                        format!("{}.{}", numbering, position + 1)
                    };
                    if node.kind == NodeKind::Folder {
                        stack.push(child.clone());
                    }
                }
            }
            if let Some(node) = self.tree.items.get_mut(&id) {
                node.children = children;
            }
        }
        self.tree
    }

    fn ensure_folder(&mut self, segments: &[&str]) -> NodeId {
        let mut current = ROOT_ID.to_string();
        let mut path = String::new();
        for segment in segments {
            let parent_path = path.clone();
            path = join_path(&path, segment);
            if let Some(existing) = self.folder_ids.get(&path) {
                current = existing.clone();
                continue;
            }

            let candidate = self
                .backend_folder_ids
                .get(&path)
                .cloned()
                .unwrap_or_else(|| path.clone());
            let mut id = candidate.clone();
            while self.tree.items.contains_key(&id) {
                id.push('/');
            }
            if id != candidate {
                warn!(node_id = %candidate, fallback = %id, "Folder id already taken");
            }

            let node = Node::folder(
                id.clone(),
                segment.to_string(),
                parent_path,
                Some(current.clone()),
            );
            if !self.insert_child(&current, node) {
                return current;
            }
            self.folder_ids.insert(path.clone(), id.clone());
            current = id;
        }
        current
    }

    /// Attach `node` under `parent_id`. An id already in the tree is never
    /// overwritten; the node is dropped with a warning instead.
    fn insert_child(&mut self, parent_id: &str, node: Node) -> bool {
        let id = node.id.clone();
        if self.tree.items.contains_key(&id) {
            warn!(node_id = %id, parent = %parent_id, "Skipping duplicate node id");
            return false;
        }
        self.tree
            .parent_map
            .insert(id.clone(), Some(parent_id.to_string()));
        self.tree.items.insert(id.clone(), node);
        if let Some(parent) = self.tree.items.get_mut(parent_id) {
            parent.children.push(id);
        }
        true
    }

    fn check_parent_hint(&self, record: &ListingRecord, id: &str) {
        let Some(hint) = record.parent_id.as_deref() else {
            return;
        };
        let actual = self.tree.parent_of(id);
        if actual != Some(hint) {
            debug!(
                node_id = %id,
                hinted = %hint,
                actual = ?actual,
                "Listing parent hint disagrees with path"
            );
        }
    }
}
