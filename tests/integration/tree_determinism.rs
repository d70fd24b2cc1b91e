use dataroom::tree::{build_from_listing, build_tree, Listing, ListingRecord, TreeIndex};
use proptest::prelude::*;

use crate::integration::support::sample_listing;

fn snapshot(tree: &TreeIndex) -> Vec<(String, String, Option<String>)> {
    tree.walk()
        .into_iter()
        .map(|n| (n.id.clone(), n.numbering.clone(), n.parent_id.clone()))
        .collect()
}

#[test]
fn rebuilding_from_same_listing_is_identical() {
    let listing = sample_listing();
    let first = build_from_listing(&listing);
    let second = build_from_listing(&listing);
    assert_eq!(snapshot(&first), snapshot(&second));
    assert_eq!(first.parent_map(), second.parent_map());
}

#[test]
fn folders_sort_before_files_and_numbering_follows_order() {
    let tree = build_from_listing(&sample_listing());
    let rows: Vec<(String, String)> = tree
        .walk()
        .into_iter()
        .map(|n| (n.numbering.clone(), n.id.clone()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("1".to_string(), "Home".to_string()),
            ("1.1".to_string(), "Home/Reports".to_string()),
            ("1.1.1".to_string(), "Home/Reports/q1.pdf".to_string()),
            ("1.1.2".to_string(), "Home/Reports/q2.pdf".to_string()),
            ("1.2".to_string(), "Home/notes.txt".to_string()),
            ("2".to_string(), "Legal".to_string()),
        ]
    );
}

#[test]
fn backend_ids_are_kept_and_moves_detected() {
    let before = build_tree(
        &[
            ListingRecord::new("Root", "Home").with_id("f-home"),
            ListingRecord::new("Root", "Legal").with_id("f-legal"),
        ],
        &[ListingRecord::new("Root/Home", "q1.pdf").with_id("d-1")],
    );
    let after = build_tree(
        &[
            ListingRecord::new("Root", "Home").with_id("f-home"),
            ListingRecord::new("Root", "Legal").with_id("f-legal"),
        ],
        &[ListingRecord::new("Root/Legal", "q1.pdf").with_id("d-1")],
    );
    assert_eq!(after.parent_of("d-1"), Some("f-legal"));
    let moves = after.moves_since(&before);
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].id, "d-1");
    assert_eq!(moves[0].from.as_deref(), Some("f-home"));
    assert_eq!(moves[0].to.as_deref(), Some("f-legal"));
}

fn arb_listing() -> impl Strategy<Value = Listing> {
    let segment = prop::sample::select(vec!["a", "b", "c", "Docs"]);
    let path = prop::collection::vec(segment, 0..3).prop_map(|s| {
        let mut p = "Root".to_string();
        for seg in s {
            p.push('/');
            p.push_str(seg);
        }
        p
    });
    let name = prop::sample::select(vec!["x.pdf", "y.doc", "z.txt", ""]);
    let files = prop::collection::vec(
        (path.clone(), name).prop_map(|(p, n)| ListingRecord::new(p, n)),
        0..12,
    );
    let folders = prop::collection::vec(
        (path, prop::sample::select(vec!["a", "b", "Docs"]))
            .prop_map(|(p, n)| ListingRecord::new(p, n)),
        0..6,
    );
    (folders, files).prop_map(|(folders, files)| Listing { folders, files })
}

proptest! {
    #[test]
    fn build_is_deterministic(listing in arb_listing()) {
        let a = build_from_listing(&listing);
        let b = build_from_listing(&listing);
        prop_assert_eq!(snapshot(&a), snapshot(&b));
    }

    #[test]
    fn every_non_root_node_has_a_folder_parent(listing in arb_listing()) {
        let tree = build_from_listing(&listing);
        for node in tree.walk() {
            let parent = node.parent_id.as_deref().and_then(|p| tree.get(p));
            prop_assert!(parent.map(|p| p.is_folder()).unwrap_or(false));
        }
    }

    #[test]
    fn rebuild_against_itself_reports_nothing(listing in arb_listing()) {
        let a = build_from_listing(&listing);
        let b = build_from_listing(&listing);
        prop_assert!(b.moves_since(&a).is_empty());
        prop_assert!(b.added_since(&a).is_empty());
        prop_assert!(b.removed_since(&a).is_empty());
    }
}
