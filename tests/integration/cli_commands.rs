use dataroom::config::DataroomConfig;
use dataroom::error::ApiError;
use dataroom::group::{InMemoryGroupRepository, PermissionGroupService};
use dataroom::tooling::cli::{CliContext, Commands, DefaultTarget, GroupCommands};
use dataroom::tree::ListingRecord;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use crate::integration::support::{sample_listing, with_xdg_env, write_listing};

const ROOM: &str = "room";

fn context(temp: &TempDir) -> CliContext {
    write_listing(temp.path(), "listing.json", &sample_listing());
    let service = PermissionGroupService::new(Arc::new(InMemoryGroupRepository::new()));
    let ctx = CliContext::with_service(temp.path().to_path_buf(), DataroomConfig::default(), service)
        .assume_yes(true);
    ctx.execute(&group(GroupCommands::Create {
        group: "legal".to_string(),
        name: "Legal".to_string(),
        all_access: false,
    }))
    .unwrap();
    ctx
}

fn group(command: GroupCommands) -> Commands {
    Commands::Group {
        dataroom: ROOM.to_string(),
        command,
    }
}

fn listing() -> PathBuf {
    PathBuf::from("listing.json")
}

fn edit(node: Option<&str>, child: bool, default: Option<DefaultTarget>, flag: &str, value: bool) -> Commands {
    Commands::Edit {
        listing: listing(),
        dataroom: ROOM.to_string(),
        group: "legal".to_string(),
        node: node.map(str::to_string),
        child,
        default,
        flag: flag.to_string(),
        value,
    }
}

fn resolve_json(ctx: &CliContext, node: &str) -> serde_json::Value {
    let out = ctx
        .execute(&Commands::Resolve {
            listing: listing(),
            dataroom: ROOM.to_string(),
            group: "legal".to_string(),
            node: node.to_string(),
            format: "json".to_string(),
        })
        .unwrap();
    serde_json::from_str(&out).unwrap()
}

#[test]
fn tree_json_lists_rows_in_display_order() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp);
    let out = ctx
        .execute(&Commands::Tree {
            listing: listing(),
            dataroom: ROOM.to_string(),
            group: Some("legal".to_string()),
            format: "json".to_string(),
        })
        .unwrap();
    let rows: serde_json::Value = serde_json::from_str(&out).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0]["id"], "Home");
    assert_eq!(rows[0]["numbering"], "1");
    assert_eq!(rows[2]["kind"], "file");
    assert_eq!(rows[2]["inScope"], false);
}

#[test]
fn child_template_edit_flows_to_files() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp);
    ctx.execute(&edit(Some("Home/Reports"), true, None, "downloadAccess", true))
        .unwrap();

    let resolved = resolve_json(&ctx, "Home/Reports/q1.pdf");
    assert_eq!(resolved["kind"], "file");
    assert_eq!(resolved["customized"], false);
    assert_eq!(resolved["inheritedFrom"], "Home/Reports");
    assert_eq!(resolved["permission"]["downloadAccess"], true);
}

#[test]
fn file_edit_shows_up_in_deviators_until_reset() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp);
    ctx.execute(&edit(Some("Home/Reports/q1.pdf"), false, None, "edit_access", true))
        .unwrap();

    let deviators = |ctx: &CliContext| -> serde_json::Value {
        let out = ctx
            .execute(&Commands::Deviators {
                listing: listing(),
                dataroom: ROOM.to_string(),
                group: "legal".to_string(),
                format: "json".to_string(),
            })
            .unwrap();
        serde_json::from_str(&out).unwrap()
    };
    let report = deviators(&ctx);
    assert_eq!(report[0]["fileId"], "Home/Reports/q1.pdf");
    assert_eq!(report[0]["explicit"], true);

    ctx.execute(&Commands::Reset {
        listing: listing(),
        dataroom: ROOM.to_string(),
        group: "legal".to_string(),
        node: "Home/Reports/q1.pdf".to_string(),
    })
    .unwrap();
    assert_eq!(deviators(&ctx).as_array().unwrap().len(), 0);
}

#[test]
fn general_mode_blocks_node_edits_but_allows_defaults() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp);
    ctx.execute(&Commands::Mode {
        dataroom: ROOM.to_string(),
        group: "legal".to_string(),
        all_access: true,
    })
    .unwrap();

    assert!(matches!(
        ctx.execute(&edit(Some("Home/notes.txt"), false, None, "editAccess", true)),
        Err(ApiError::GeneralAccessMode(_))
    ));
    ctx.execute(&edit(None, false, Some(DefaultTarget::File), "editAccess", true))
        .unwrap();
    assert_eq!(resolve_json(&ctx, "Home/notes.txt")["permission"]["editAccess"], true);
}

#[test]
fn unknown_flag_is_rejected() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp);
    assert!(matches!(
        ctx.execute(&edit(Some("Home"), false, None, "teleport", true)),
        Err(ApiError::InvalidFlag(_))
    ));
}

#[test]
fn visibility_updates_scope_and_sync_prunes_removed_nodes() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp);
    ctx.execute(&Commands::Visibility {
        listing: listing(),
        dataroom: ROOM.to_string(),
        group: "legal".to_string(),
        node: "Home/Reports".to_string(),
        visible: true,
    })
    .unwrap();

    let mut next = sample_listing();
    next.files.retain(|f| f.name != "q2.pdf");
    next.files.push(ListingRecord::new("Root/Legal", "nda.pdf"));
    write_listing(temp.path(), "next.json", &next);

    let out = ctx
        .execute(&Commands::Sync {
            previous: listing(),
            listing: PathBuf::from("next.json"),
            dataroom: ROOM.to_string(),
            group: "legal".to_string(),
            format: "json".to_string(),
        })
        .unwrap();
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["removed"][0], "Home/Reports/q2.pdf");
    assert_eq!(report["added"][0], "Legal/nda.pdf");

    let show = ctx
        .execute(&group(GroupCommands::Show {
            group: "legal".to_string(),
            format: "json".to_string(),
        }))
        .unwrap();
    let shown: serde_json::Value = serde_json::from_str(&show).unwrap();
    let scope: Vec<&str> = shown["scope"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(scope, vec!["Home/Reports", "Home/Reports/q1.pdf"]);
}

#[test]
fn group_delete_respects_assignments() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp);
    ctx.execute(&group(GroupCommands::Assign {
        user: "ana".to_string(),
        group: "legal".to_string(),
        email: Some("ana@example.com".to_string()),
    }))
    .unwrap();

    let delete = group(GroupCommands::Delete {
        group: "legal".to_string(),
        force: true,
    });
    assert!(matches!(
        ctx.execute(&delete),
        Err(ApiError::GroupInUse { .. })
    ));

    let collaborators = ctx
        .execute(&group(GroupCommands::Collaborators {
            format: "text".to_string(),
        }))
        .unwrap();
    assert!(collaborators.contains("ana@example.com"));

    ctx.execute(&group(GroupCommands::Unassign {
        user: "ana".to_string(),
    }))
    .unwrap();
    assert_eq!(
        ctx.execute(&delete).unwrap(),
        "Deleted permission group: legal"
    );
}

#[test]
fn context_uses_workspace_config_for_storage() {
    let temp = TempDir::new().unwrap();
    with_xdg_env(&temp, || {
        let workspace = temp.path().join("workspace");
        fs::create_dir_all(&workspace).unwrap();
        fs::write(
            workspace.join("dataroom.toml"),
            "[storage]\ngroups_path = \"acl\"\n",
        )
        .unwrap();

        let ctx = CliContext::new(workspace.clone(), None).unwrap();
        ctx.execute(&group(GroupCommands::Create {
            group: "ops".to_string(),
            name: "Ops".to_string(),
            all_access: true,
        }))
        .unwrap();
        assert!(workspace.join("acl/room/groups/ops.toml").exists());

        let listed = ctx
            .execute(&group(GroupCommands::List {
                format: "text".to_string(),
            }))
            .unwrap();
        assert!(listed.contains("general"));
    });
}
