//! TreeIndex: arena of nodes keyed by id plus the parent lookup map.

use crate::tree::node::{Node, NodeKind};
use crate::types::{NodeId, ROOT_ID};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// child id -> parent id (`None` only for the root).
pub type ParentMap = HashMap<NodeId, Option<NodeId>>;

/// Navigable dataroom tree.
///
/// Nodes are stored flat and reference each other by id; every rebuild
/// produces a fresh index rather than mutating shared nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeIndex {
    pub(crate) items: HashMap<NodeId, Node>,
    pub(crate) parent_map: ParentMap,
}

/// A node whose parent changed between two builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeMove {
    pub id: NodeId,
    pub from: Option<NodeId>,
    pub to: Option<NodeId>,
}

impl TreeIndex {
    /// Tree holding only the root.
    pub fn empty() -> Self {
        let root = Node::folder(ROOT_ID.to_string(), ROOT_ID.to_string(), String::new(), None);
        let mut items = HashMap::new();
        items.insert(ROOT_ID.to_string(), root);
        let mut parent_map = HashMap::new();
        parent_map.insert(ROOT_ID.to_string(), None);
        Self { items, parent_map }
    }

    pub fn root(&self) -> &Node {
        // The root is inserted by every constructor and never removed.
        &self.items[ROOT_ID]
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn items(&self) -> &HashMap<NodeId, Node> {
        &self.items
    }

    pub fn parent_map(&self) -> &ParentMap {
        &self.parent_map
    }

    /// Ids of the top-level nodes (children of the root).
    pub fn top_level(&self) -> &[NodeId] {
        &self.root().children
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.parent_map.get(id).and_then(|p| p.as_deref())
    }

    pub fn children(&self, id: &str) -> impl Iterator<Item = &Node> {
        self.items
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|child| self.items.get(child))
    }

    /// Ancestor ids, nearest first, ending with the root.
    pub fn ancestors(&self, id: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            out.push(parent.to_string());
            current = self.parent_of(parent);
        }
        out
    }

    /// Descendant ids in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<&str> = match self.items.get(id) {
            Some(node) => node.children.iter().rev().map(String::as_str).collect(),
            None => return out,
        };
        while let Some(next) = stack.pop() {
            out.push(next.to_string());
            if let Some(node) = self.items.get(next) {
                stack.extend(node.children.iter().rev().map(String::as_str));
            }
        }
        out
    }

    /// All nodes in display order (pre-order from the root, root excluded).
    pub fn walk(&self) -> Vec<&Node> {
        self.descendants(ROOT_ID)
            .iter()
            .filter_map(|id| self.items.get(id))
            .collect()
    }

    /// Folder nodes including the root.
    pub fn folders(&self) -> impl Iterator<Item = &Node> {
        self.items.values().filter(|n| n.kind == NodeKind::Folder)
    }

    pub fn files(&self) -> impl Iterator<Item = &Node> {
        self.items.values().filter(|n| n.kind == NodeKind::File)
    }

    /// Number of nodes excluding the root.
    pub fn len(&self) -> usize {
        self.items.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a node by its normalized full path ("Home/Reports/q1.pdf").
    pub fn find_by_path(&self, path: &str) -> Option<&Node> {
        let wanted = crate::tree::node::path_segments(path).join("/");
        if wanted.is_empty() {
            return Some(self.root());
        }
        self.items
            .values()
            .filter(|n| n.id != ROOT_ID)
            .find(|n| n.full_path() == wanted)
    }

    /// Nodes present in both trees whose parent changed, sorted by id.
    pub fn moves_since(&self, previous: &TreeIndex) -> Vec<NodeMove> {
        let mut moves: Vec<NodeMove> = self
            .parent_map
            .iter()
            .filter_map(|(id, parent)| {
                let before = previous.parent_map.get(id)?;
                (before != parent).then(|| NodeMove {
                    id: id.clone(),
                    from: before.clone(),
                    to: parent.clone(),
                })
            })
            .collect();
        moves.sort_by(|a, b| a.id.cmp(&b.id));
        moves
    }

    /// Ids present here but not in `previous`.
    pub fn added_since(&self, previous: &TreeIndex) -> BTreeSet<NodeId> {
        self.items
            .keys()
            .filter(|id| !previous.items.contains_key(*id))
            .cloned()
            .collect()
    }

    /// Ids present in `previous` but not here.
    pub fn removed_since(&self, previous: &TreeIndex) -> BTreeSet<NodeId> {
        previous.added_since(self)
    }
}

impl Default for TreeIndex {
    fn default() -> Self {
        Self::empty()
    }
}
