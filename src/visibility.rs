//! Selection/Visibility Propagator
//!
//! Functional updates of the selection set that decides which nodes are in a
//! group's scope at all. Folder toggles cascade down; a file made visible pulls
//! its ancestor folders in; a file made invisible only removes itself.

use crate::tree::TreeIndex;
use crate::types::{NodeId, ROOT_ID};
use std::collections::BTreeSet;
use tracing::debug;

/// Return the selection after toggling `node_id` to `visible`.
///
/// Unknown ids leave the selection unchanged. The implicit root is never
/// itself part of a selection.
pub fn set_visibility(
    tree: &TreeIndex,
    node_id: &str,
    visible: bool,
    selection: &BTreeSet<NodeId>,
) -> BTreeSet<NodeId> {
    let mut next = selection.clone();
    let Some(node) = tree.get(node_id) else {
        debug!(node_id = %node_id, "Visibility toggle for unknown node ignored");
        return next;
    };

    if node.is_folder() {
        let mut affected = tree.descendants(node_id);
        affected.push(node_id.to_string());
        for id in affected.into_iter().filter(|id| id != ROOT_ID) {
            if visible {
                next.insert(id);
            } else {
                next.remove(&id);
            }
        }
    } else if visible {
        next.insert(node_id.to_string());
        next.extend(
            tree.ancestors(node_id)
                .into_iter()
                .filter(|id| id != ROOT_ID),
        );
    } else {
        next.remove(node_id);
    }
    next
}
