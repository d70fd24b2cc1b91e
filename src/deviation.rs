//! Deviation Reconciler
//!
//! Finds files whose effective permission differs from their parent folder's
//! child file standard, or that are explicitly customized. Read-only: the
//! tree and the permission map are never modified.

use crate::permission::{ComparableFlags, FileFlag, PermissionDefaults, PermissionMap};
use crate::resolver::{resolve_file_permission, resolve_folder_permission};
use crate::tree::TreeIndex;
use crate::types::NodeId;
use serde::Serialize;
use std::collections::BTreeSet;

/// Why a file was flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deviation {
    pub file_id: NodeId,
    pub parent_id: NodeId,
    /// The file is marked customized.
    pub explicit: bool,
    /// Compared flags whose values differ from the parent template.
    pub differing: Vec<FileFlag>,
}

/// Ids of all deviating files.
pub fn find_deviators(
    tree: &TreeIndex,
    permissions: &PermissionMap,
    defaults: &PermissionDefaults,
    comparable: &ComparableFlags,
) -> BTreeSet<NodeId> {
    deviation_report(tree, permissions, defaults, comparable)
        .into_iter()
        .map(|d| d.file_id)
        .collect()
}

/// Detailed deviation list, sorted by file id.
///
/// Visits every folder once and each of its direct file children once.
pub fn deviation_report(
    tree: &TreeIndex,
    permissions: &PermissionMap,
    defaults: &PermissionDefaults,
    comparable: &ComparableFlags,
) -> Vec<Deviation> {
    let parent_map = tree.parent_map();
    let mut out = Vec::new();
    for folder in tree.folders() {
        let template = resolve_folder_permission(&folder.id, permissions, defaults).child_file_perms;
        for file in tree.children(&folder.id).filter(|n| n.is_file()) {
            let explicit = permissions
                .file(&file.id)
                .map(|r| r.is_customized)
                .unwrap_or(false);
            let resolved = resolve_file_permission(&file.id, permissions, parent_map, defaults);
            let differing = resolved.differing(&template, comparable.as_slice());
            if explicit || !differing.is_empty() {
                out.push(Deviation {
                    file_id: file.id.clone(),
                    parent_id: folder.id.clone(),
                    explicit,
                    differing,
                });
            }
        }
    }
    out.sort_by(|a, b| a.file_id.cmp(&b.file_id));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::{FilePermission, FilePermissionRecord};
    use crate::tree::{build_tree, ListingRecord};

    fn tree() -> TreeIndex {
        build_tree(
            &[ListingRecord::new("Root", "Home"), ListingRecord::new("Root/Home", "Reports")],
            &[
                ListingRecord::new("Root/Home/Reports", "q1.pdf"),
                ListingRecord::new("Root/Home/Reports", "q2.pdf"),
                ListingRecord::new("Root", "top.pdf"),
            ],
        )
    }

    #[test]
    fn inheriting_files_are_not_deviators() {
        let mut perms = PermissionMap::new();
        perms
            .folder_mut("Home/Reports")
            .unwrap()
            .child_file_perms
            .set(FileFlag::EditAccess, Some(true));
        let found = find_deviators(
            &tree(),
            &perms,
            &PermissionDefaults::default(),
            &ComparableFlags::default(),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn customized_file_is_a_deviator_even_with_equal_values() {
        let defaults = PermissionDefaults::default();
        let mut perms = PermissionMap::new();
        perms.insert_file(
            "Home/Reports/q1.pdf",
            FilePermissionRecord::customized(&defaults.folder.child_file_perms),
        );
        let report = deviation_report(&tree(), &perms, &defaults, &ComparableFlags::default());
        assert_eq!(report.len(), 1);
        assert!(report[0].explicit);
        assert!(report[0].differing.is_empty());
        assert_eq!(report[0].parent_id, "Home/Reports");
    }

    #[test]
    fn excluded_flags_do_not_count_as_differences() {
        let defaults = PermissionDefaults::default();
        let mut own = defaults.folder.child_file_perms;
        own.view_access = !own.view_access;
        own.watermark_content = !own.watermark_content;
        own.add_tags = !own.add_tags;
        let mut perms = PermissionMap::new();
        perms.insert_file("top.pdf", FilePermissionRecord::customized(&own));

        let report = deviation_report(&tree(), &perms, &defaults, &ComparableFlags::default());
        assert_eq!(report[0].differing, vec![FileFlag::AddTags]);

        let report = deviation_report(&tree(), &perms, &defaults, &ComparableFlags::all());
        assert_eq!(
            report[0].differing,
            vec![FileFlag::ViewAccess, FileFlag::WatermarkContent, FileFlag::AddTags]
        );
    }

    #[test]
    fn scan_does_not_touch_inputs() {
        let defaults = PermissionDefaults::default();
        let tree = tree();
        let mut perms = PermissionMap::new();
        perms.insert_file(
            "Home/Reports/q2.pdf",
            FilePermissionRecord::customized(&FilePermission::uniform(true)),
        );
        let before = (tree.clone(), perms.clone());
        let found = find_deviators(&tree, &perms, &defaults, &ComparableFlags::default());
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["Home/Reports/q2.pdf".to_string()]);
        assert_eq!((tree, perms), before);
    }
}
