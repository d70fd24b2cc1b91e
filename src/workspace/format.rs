//! Format trees, resolved permissions, deviations and groups as text.

use crate::deviation::Deviation;
use crate::permission::{
    Collaborator, FileFlag, FilePermission, FolderFlag, FolderPermission, PermissionGroup,
    PermissionRecord,
};
use crate::workspace::types::{GroupSummary, RebuildReport, ResolvedOutput, TreeRow};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Format the tree as an indented table.
pub fn format_tree_text(rows: &[TreeRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Dataroom")));
    if rows.is_empty() {
        out.push_str("Dataroom is empty.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Name", "Kind", "Id", "Scope", "Custom"]);
    for row in rows {
        let marker = if row.deviates { "*" } else { "" };
        table.add_row(vec![
            row.numbering.clone(),
            format!("{}{}{}", "  ".repeat(row.depth), row.name, marker),
            row.kind.clone(),
            row.id.clone(),
            yes_no(row.in_scope).to_string(),
            yes_no(row.customized).to_string(),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    let deviating = rows.iter().filter(|r| r.deviates).count();
    out.push_str(&format!(
        "Total: {} nodes, {} deviating from their folder.\n",
        rows.len(),
        deviating
    ));
    out
}

fn file_flag_table(perms: &FilePermission) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Flag", "Allowed"]);
    for flag in FileFlag::ALL {
        table.add_row(vec![flag.as_str().to_string(), yes_no(perms.get(*flag)).to_string()]);
    }
    table
}

fn folder_flag_table(perms: &FolderPermission) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Flag", "Allowed"]);
    for flag in FolderFlag::ALL {
        table.add_row(vec![flag.as_str().to_string(), yes_no(perms.get(*flag)).to_string()]);
    }
    table
}

/// Format a resolved permission.
pub fn format_resolved_text(resolved: &ResolvedOutput) -> String {
    let mut out = String::new();
    match resolved {
        ResolvedOutput::File {
            id,
            customized,
            inherited_from,
            permission,
        } => {
            out.push_str(&format!("{}\n\n", format_section_heading(&format!("File {}", id))));
            match inherited_from {
                Some(folder) if !customized => {
                    out.push_str(&format!("  Inherited from: {}\n\n", folder))
                }
                _ if *customized => out.push_str("  Customized: yes\n\n"),
                _ => out.push_str("  Source: group defaults\n\n"),
            }
            out.push_str(&format!("{}\n", file_flag_table(permission)));
        }
        ResolvedOutput::Folder { id, permission } => {
            out.push_str(&format!(
                "{}\n\n",
                format_section_heading(&format!("Folder {}", id))
            ));
            out.push_str(&format!("{}\n\n", folder_flag_table(permission)));
            out.push_str(&format!(
                "{}\n\n",
                format_section_heading("Child file standard")
            ));
            out.push_str(&format!("{}\n", file_flag_table(&permission.child_file_perms)));
        }
    }
    out
}

/// Format deviating files.
pub fn format_deviations_text(deviations: &[Deviation]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Deviating files")));
    if deviations.is_empty() {
        out.push_str("All files follow their folder's child file standard.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["File", "Folder", "Customized", "Differs on"]);
    for d in deviations {
        let differing = if d.differing.is_empty() {
            "-".to_string()
        } else {
            d.differing
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        table.add_row(vec![
            d.file_id.clone(),
            d.parent_id.clone(),
            yes_no(d.explicit).to_string(),
            differing,
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!("Total: {} files.\n", deviations.len()));
    out
}

/// Format permission groups with their assigned users.
pub fn format_group_list_text(groups: &[GroupSummary]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Permission groups")));
    if groups.is_empty() {
        out.push_str("No permission groups configured.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Group", "Name", "Mode", "Overrides", "Scope", "Users"]);
    for g in groups {
        let mode = if g.all_access { "general" } else { "specific" };
        let users = if g.users.is_empty() {
            "-".to_string()
        } else {
            g.users.join(", ")
        };
        table.add_row(vec![
            g.id.clone(),
            g.name.clone(),
            mode.to_string(),
            g.overrides.to_string(),
            g.scope.to_string(),
            users,
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!("Total: {} groups.\n", groups.len()));
    out
}

/// Format one group: mode, defaults and stored overrides.
pub fn format_group_detail_text(group: &PermissionGroup) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}

",
        format_section_heading(&format!("Group {} ({})", group.name, group.id))
    ));
    let mode = if group.all_access { "general" } else { "specific" };
    out.push_str(&format!("  Mode: {}\n", mode));
    out.push_str(&format!("  Scope: {} nodes\n\n", group.scope.len()));
    out.push_str(&format!("{}\n\n", format_section_heading("Default file")));
    out.push_str(&format!("{}\n\n", file_flag_table(&group.defaults.file)));
    out.push_str(&format!("{}\n\n", format_section_heading("Default folder")));
    out.push_str(&format!("{}\n\n", folder_flag_table(&group.defaults.folder)));

    out.push_str(&format!("{}\n\n", format_section_heading("Overrides")));
    if group.overrides.is_empty() {
        out.push_str("No per-node overrides.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Node", "Kind", "Pinned flags"]);
    for (id, record) in group.overrides.iter() {
        let (kind, pinned) = match record {
            PermissionRecord::File(r) => {
                let kind = if r.is_customized { "file (customized)" } else { "file" };
                (kind, pinned_file_flags(&r.overrides))
            }
            PermissionRecord::Folder(r) => {
                let mut pinned: Vec<String> = FolderFlag::ALL
                    .iter()
                    .filter_map(|f| r.overrides.get(*f).map(|v| format!("{}={}", f, v)))
                    .collect();
                pinned.extend(
                    pinned_file_flags(&r.child_file_perms)
                        .into_iter()
                        .map(|p| format!("child.{}", p)),
                );
                ("folder", pinned)
            }
        };
        let pinned = if pinned.is_empty() {
            "-".to_string()
        } else {
            pinned.join(", ")
        };
        table.add_row(vec![id.clone(), kind.to_string(), pinned]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

fn pinned_file_flags(overrides: &crate::permission::FileOverrides) -> Vec<String> {
    FileFlag::ALL
        .iter()
        .filter_map(|f| overrides.get(*f).map(|v| format!("{}={}", f, v)))
        .collect()
}

/// Format collaborator assignments.
pub fn format_collaborators_text(collaborators: &[Collaborator]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Collaborators")));
    if collaborators.is_empty() {
        out.push_str("No collaborators assigned.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["User", "Email", "Group"]);
    for c in collaborators {
        table.add_row(vec![
            c.user_id.clone(),
            c.email.clone().unwrap_or_else(|| "-".to_string()),
            c.group_id.clone(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// Format a rebuild report; empty when nothing changed.
pub fn format_rebuild_report_text(report: &RebuildReport) -> String {
    if report.is_unchanged() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_section_heading("Listing changes")));
    for id in &report.added {
        out.push_str(&format!("  + {}\n", id));
    }
    for id in &report.removed {
        out.push_str(&format!("  - {}\n", id));
    }
    for moved in &report.moved {
        out.push_str(&format!(
            "  ~ {} ({} -> {})\n",
            moved.id,
            moved.from.as_deref().unwrap_or("-"),
            moved.to.as_deref().unwrap_or("-")
        ));
    }
    out
}
