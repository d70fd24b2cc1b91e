use dataroom::error::ApiError;
use dataroom::permission::{
    ComparableFlags, FileFlag, FolderFlag, PermissionDefaults, PermissionGroup,
};
use dataroom::tree::{Listing, ListingRecord};
use dataroom::workspace::PermissionWorkspace;
use std::collections::BTreeSet;

use crate::integration::support::sample_listing;

const REPORTS: &str = "Home/Reports";
const Q1: &str = "Home/Reports/q1.pdf";
const Q2: &str = "Home/Reports/q2.pdf";

fn workspace() -> PermissionWorkspace {
    PermissionWorkspace::from_listing(&sample_listing(), PermissionGroup::new("legal", "Legal"))
}

#[test]
fn template_toggle_reaches_uncustomized_file() {
    let mut ws = workspace();
    ws.edit_child_file_flag(REPORTS, FileFlag::ViewAccess, true)
        .unwrap();
    assert!(ws.resolve_file(Q1).unwrap().view_access);

    ws.edit_child_file_flag(REPORTS, FileFlag::ViewAccess, false)
        .unwrap();
    assert!(!ws.resolve_file(Q1).unwrap().view_access);
    // the file's own record was never touched
    assert!(ws.group().overrides.file(Q1).is_none());
}

#[test]
fn direct_edit_customizes_and_deviates() {
    let mut ws = workspace();
    ws.edit_file_flag(Q1, FileFlag::EditAccess, true).unwrap();
    assert!(ws.is_customized(Q1));
    assert!(ws.deviators().contains(Q1));
    assert!(!ws.deviators().contains(Q2));
}

#[test]
fn customized_file_ignores_later_template_changes() {
    let mut ws = workspace();
    ws.edit_file_flag(Q1, FileFlag::AddComments, true).unwrap();
    ws.edit_child_file_flag(REPORTS, FileFlag::DownloadAccess, true)
        .unwrap();
    assert!(!ws.resolve_file(Q1).unwrap().download_access);
    assert!(ws.resolve_file(Q2).unwrap().download_access);
}

#[test]
fn reset_removes_file_from_deviators() {
    let mut ws = workspace();
    ws.edit_file_flag(Q1, FileFlag::EditAccess, true).unwrap();
    let template = ws.reset_to_folder_default(Q1).unwrap();

    assert!(!ws.is_customized(Q1));
    assert!(!ws.deviators().contains(Q1));
    assert_eq!(ws.resolve_file(Q1).unwrap(), template);
    assert_eq!(template, ws.resolve_folder(REPORTS).unwrap().child_file_perms);
}

#[test]
fn folder_visibility_selects_exactly_its_subtree() {
    let mut ws = workspace();
    ws.set_visibility("Legal", true).unwrap();
    let scope = ws.set_visibility(REPORTS, true).unwrap().clone();
    let expected: BTreeSet<String> = ["Legal", REPORTS, Q1, Q2]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(scope, expected);

    // idempotent
    assert_eq!(ws.set_visibility(REPORTS, true).unwrap(), &expected);
}

#[test]
fn hiding_a_file_keeps_its_ancestors() {
    let mut ws = workspace();
    ws.set_visibility(Q1, true).unwrap();
    ws.set_visibility(Q2, true).unwrap();
    ws.set_visibility(Q1, false).unwrap();
    let scope: Vec<&str> = ws.selection().iter().map(String::as_str).collect();
    assert_eq!(scope, vec!["Home", REPORTS, Q2]);
}

#[test]
fn folder_flags_do_not_inherit_from_grandparent() {
    let mut ws = workspace();
    ws.edit_folder_flag("Home", FolderFlag::AllowUploads, true)
        .unwrap();
    assert!(ws.resolve_folder("Home").unwrap().access.allow_uploads);
    assert!(!ws.resolve_folder(REPORTS).unwrap().access.allow_uploads);
}

#[test]
fn general_mode_uses_defaults_and_restores_overrides() {
    let mut ws = workspace();
    ws.edit_child_file_flag(REPORTS, FileFlag::EditAccess, true)
        .unwrap();
    ws.set_all_access(true);
    assert!(!ws.resolve_file(Q1).unwrap().edit_access);
    assert!(matches!(
        ws.edit_child_file_flag(REPORTS, FileFlag::EditAccess, false),
        Err(ApiError::GeneralAccessMode(_))
    ));

    ws.set_all_access(false);
    assert!(ws.resolve_file(Q1).unwrap().edit_access);
}

#[test]
fn reset_files_follow_later_template_edits() {
    let group = PermissionGroup::new("legal", "Legal").with_defaults(PermissionDefaults::default());
    let mut ws = PermissionWorkspace::from_listing(&sample_listing(), group)
        .with_comparable_flags(ComparableFlags::all());
    ws.edit_file_flag(Q1, FileFlag::EditAccess, true).unwrap();
    ws.reset_to_folder_default(Q1).unwrap();
    ws.edit_child_file_flag(REPORTS, FileFlag::WatermarkContent, true)
        .unwrap();

    assert!(ws.resolve_file(Q1).unwrap().watermark_content);
    assert!(ws.deviators().is_empty());
}

#[test]
fn explicit_deviation_report_names_differing_flags() {
    let mut ws = workspace();
    ws.edit_file_flag(Q1, FileFlag::EditAccess, true).unwrap();
    ws.edit_file_flag(Q1, FileFlag::WatermarkContent, true).unwrap();
    let report = ws.deviation_report();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].parent_id, REPORTS);
    // watermarkContent is not compared by default
    assert_eq!(report[0].differing, vec![FileFlag::EditAccess]);
}

#[test]
fn file_replaced_by_folder_stops_carrying_its_old_record() {
    let before = Listing {
        folders: vec![ListingRecord::new("Root", "a")],
        files: vec![ListingRecord::new("Root/a", "b")],
    };
    let mut ws =
        PermissionWorkspace::from_listing(&before, PermissionGroup::new("legal", "Legal"));
    ws.edit_file_flag("a/b", FileFlag::EditAccess, true).unwrap();
    ws.edit_child_file_flag("a", FileFlag::AddTags, true).unwrap();
    assert!(ws.is_customized("a/b"));

    let after = Listing {
        folders: vec![
            ListingRecord::new("Root", "a"),
            ListingRecord::new("Root/a", "b"),
        ],
        files: vec![ListingRecord::new("Root/a/b", "y.pdf")],
    };
    ws.rebuild(&after);

    assert!(ws.group().overrides.get("a/b").is_none());
    let y = ws.resolve_file("a/b/y.pdf").unwrap();
    assert_eq!(y, ws.resolve_folder("a/b").unwrap().child_file_perms);
    // the grandparent's template does not leak through the former file id
    assert!(!y.add_tags);
    assert!(ws.deviators().is_empty());

    ws.edit_child_file_flag("a/b", FileFlag::AddTags, true).unwrap();
    assert!(ws.resolve_file("a/b/y.pdf").unwrap().add_tags);
}

#[test]
fn folder_replaced_by_file_starts_uncustomized() {
    let before = Listing {
        folders: vec![
            ListingRecord::new("Root", "a"),
            ListingRecord::new("Root/a", "b"),
        ],
        files: vec![],
    };
    let mut ws =
        PermissionWorkspace::from_listing(&before, PermissionGroup::new("legal", "Legal"));
    ws.edit_folder_flag("a/b", FolderFlag::AllowUploads, true)
        .unwrap();

    let after = Listing {
        folders: vec![ListingRecord::new("Root", "a")],
        files: vec![ListingRecord::new("Root/a", "b")],
    };
    ws.rebuild(&after);

    assert!(ws.group().overrides.get("a/b").is_none());
    assert!(!ws.is_customized("a/b"));
    // editing the new file must not trip over the old folder record
    assert!(ws.edit_file_flag("a/b", FileFlag::EditAccess, true).unwrap().edit_access);
}
