//! CLI Tooling
//!
//! Command-line interface for inspecting and editing permission groups
//! against a dataroom listing.

use crate::config::{ConfigLoader, DataroomConfig};
use crate::error::{ApiError, StorageError};
use crate::group::{PermissionGroupService, XdgGroupRepository};
use crate::permission::{Collaborator, FileFlag, FolderFlag, PermissionGroup};
use crate::tree::Listing;
use crate::workspace::{
    format_collaborators_text, format_deviations_text, format_group_detail_text,
    format_group_list_text, format_rebuild_report_text, format_resolved_text, format_tree_text,
    PermissionWorkspace,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Dataroom CLI - permission groups over a folder/file listing
#[derive(Parser)]
#[command(name = "dataroom")]
#[command(about = "Inspect and edit dataroom permission inheritance")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Which template a flag edit targets when no node is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DefaultTarget {
    File,
    Folder,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the dataroom tree with scope and deviation markers
    Tree {
        /// Listing JSON file ({"folders": [...], "files": [...]})
        #[arg(long)]
        listing: PathBuf,
        #[arg(long, default_value = "default")]
        dataroom: String,
        /// Permission group to annotate the tree with
        #[arg(long)]
        group: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the effective permission of a node
    Resolve {
        #[arg(long)]
        listing: PathBuf,
        #[arg(long, default_value = "default")]
        dataroom: String,
        #[arg(long)]
        group: String,
        /// Node id
        node: String,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List files whose permissions differ from their folder's child file standard
    Deviators {
        #[arg(long)]
        listing: PathBuf,
        #[arg(long, default_value = "default")]
        dataroom: String,
        #[arg(long)]
        group: String,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Set one permission flag and save the group
    Edit {
        #[arg(long)]
        listing: PathBuf,
        #[arg(long, default_value = "default")]
        dataroom: String,
        #[arg(long)]
        group: String,
        /// Node to edit; omit together with --default to edit group defaults
        #[arg(long, conflicts_with = "default")]
        node: Option<String>,
        /// Edit a folder's child file standard instead of the folder itself
        #[arg(long, requires = "node")]
        child: bool,
        /// Edit the group default file or folder permission
        #[arg(long, value_enum)]
        default: Option<DefaultTarget>,
        /// Flag name (camelCase or snake_case)
        #[arg(long)]
        flag: String,
        #[arg(long, action = clap::ArgAction::Set)]
        value: bool,
    },
    /// Reset a file to its folder's child file standard
    Reset {
        #[arg(long)]
        listing: PathBuf,
        #[arg(long, default_value = "default")]
        dataroom: String,
        #[arg(long)]
        group: String,
        /// File id
        node: String,
    },
    /// Include or exclude a node (and related nodes) from the group scope
    Visibility {
        #[arg(long)]
        listing: PathBuf,
        #[arg(long, default_value = "default")]
        dataroom: String,
        #[arg(long)]
        group: String,
        node: String,
        #[arg(long, action = clap::ArgAction::Set)]
        visible: bool,
    },
    /// Switch a group between general (all access) and specific mode
    Mode {
        #[arg(long, default_value = "default")]
        dataroom: String,
        #[arg(long)]
        group: String,
        #[arg(long, action = clap::ArgAction::Set)]
        all_access: bool,
    },
    /// Reconcile a group with a new listing, dropping records of removed nodes
    Sync {
        /// Listing the group was last edited against
        #[arg(long)]
        previous: PathBuf,
        #[arg(long)]
        listing: PathBuf,
        #[arg(long, default_value = "default")]
        dataroom: String,
        #[arg(long)]
        group: String,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Manage permission groups
    Group {
        #[arg(long, default_value = "default")]
        dataroom: String,
        #[command(subcommand)]
        command: GroupCommands,
    },
}

#[derive(Subcommand)]
pub enum GroupCommands {
    /// List groups with their assigned users
    List {
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show a group's defaults and overrides
    Show {
        group: String,
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Create a new group
    Create {
        group: String,
        #[arg(long)]
        name: String,
        /// Start in general (all access) mode
        #[arg(long)]
        all_access: bool,
    },
    /// Delete a group (fails while collaborators reference it)
    Delete {
        group: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
    /// Assign a collaborator to a group
    Assign {
        user: String,
        #[arg(long)]
        group: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Remove a collaborator's assignment
    Unassign { user: String },
    /// List collaborators
    Collaborators {
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// CLI context for executing commands
pub struct CliContext {
    workspace_root: PathBuf,
    config: DataroomConfig,
    groups: PermissionGroupService,
    assume_yes: bool,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        let groups_root = config.storage.resolve_groups_path_in(&workspace_root)?;
        debug!(path = %groups_root.display(), "Using group storage");
        let service = PermissionGroupService::new(Arc::new(XdgGroupRepository::new(groups_root)));
        Ok(Self::with_service(workspace_root, config, service))
    }

    /// Context over an existing group service.
    pub fn with_service(
        workspace_root: PathBuf,
        config: DataroomConfig,
        groups: PermissionGroupService,
    ) -> Self {
        Self {
            workspace_root,
            config,
            groups,
            assume_yes: false,
        }
    }

    /// Skip interactive confirmations.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn config(&self) -> &DataroomConfig {
        &self.config
    }

    pub fn groups(&self) -> &PermissionGroupService {
        &self.groups
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Tree {
                listing,
                dataroom,
                group,
                format,
            } => {
                let group = match group {
                    Some(id) => self.groups.get(dataroom, id)?,
                    None => PermissionGroup::new("preview", "Preview"),
                };
                let ws = self.workspace(listing, group)?;
                let rows = ws.tree_rows();
                render(format, &rows, || format_tree_text(&rows))
            }
            Commands::Resolve {
                listing,
                dataroom,
                group,
                node,
                format,
            } => {
                let ws = self.workspace(listing, self.groups.get(dataroom, group)?)?;
                let resolved = ws.describe(node)?;
                render(format, &resolved, || format_resolved_text(&resolved))
            }
            Commands::Deviators {
                listing,
                dataroom,
                group,
                format,
            } => {
                let ws = self.workspace(listing, self.groups.get(dataroom, group)?)?;
                let report = ws.deviation_report();
                render(format, &report, || format_deviations_text(&report))
            }
            Commands::Edit {
                listing,
                dataroom,
                group,
                node,
                child,
                default,
                flag,
                value,
            } => self.handle_edit(
                listing,
                dataroom,
                group,
                EditTarget::from_args(node.as_deref(), *child, *default)?,
                flag,
                *value,
            ),
            Commands::Reset {
                listing,
                dataroom,
                group,
                node,
            } => {
                let mut ws = self.workspace(listing, self.groups.get(dataroom, group)?)?;
                ws.reset_to_folder_default(node)?;
                let resolved = ws.describe(node)?;
                self.groups.save(dataroom, ws.group())?;
                Ok(format_resolved_text(&resolved))
            }
            Commands::Visibility {
                listing,
                dataroom,
                group,
                node,
                visible,
            } => {
                let mut ws = self.workspace(listing, self.groups.get(dataroom, group)?)?;
                let scope_len = ws.set_visibility(node, *visible)?.len();
                self.groups.save(dataroom, ws.group())?;
                Ok(format!(
                    "{} {}; scope now has {} nodes.",
                    if *visible { "Included" } else { "Excluded" },
                    node,
                    scope_len
                ))
            }
            Commands::Mode {
                dataroom,
                group,
                all_access,
            } => {
                let mut group = self.groups.get(dataroom, group)?;
                group.all_access = *all_access;
                self.groups.save(dataroom, &group)?;
                let mode = if *all_access { "general" } else { "specific" };
                Ok(format!("Group {} is now in {} mode.", group.id, mode))
            }
            Commands::Sync {
                previous,
                listing,
                dataroom,
                group,
                format,
            } => {
                let mut ws = self.workspace(previous, self.groups.get(dataroom, group)?)?;
                let report = ws.rebuild(&self.read_listing(listing)?);
                if !report.is_unchanged() {
                    self.groups.save(dataroom, ws.group())?;
                }
                render(format, &report, || {
                    let text = format_rebuild_report_text(&report);
                    if text.is_empty() {
                        "Listing unchanged.".to_string()
                    } else {
                        text
                    }
                })
            }
            Commands::Group { dataroom, command } => self.handle_group_command(dataroom, command),
        }
    }

    fn handle_edit(
        &self,
        listing: &Path,
        dataroom: &str,
        group_id: &str,
        target: EditTarget<'_>,
        flag: &str,
        value: bool,
    ) -> Result<String, ApiError> {
        let mut ws = self.workspace(listing, self.groups.get(dataroom, group_id)?)?;
        let described = match target {
            EditTarget::Node(node) => {
                let is_folder = ws
                    .tree()
                    .get(node)
                    .map(|n| n.is_folder())
                    .ok_or_else(|| ApiError::NodeNotFound(node.to_string()))?;
                if is_folder {
                    ws.edit_folder_flag(node, flag.parse::<FolderFlag>()?, value)?;
                } else {
                    ws.edit_file_flag(node, flag.parse::<FileFlag>()?, value)?;
                }
                format_resolved_text(&ws.describe(node)?)
            }
            EditTarget::ChildTemplate(node) => {
                ws.edit_child_file_flag(node, flag.parse::<FileFlag>()?, value)?;
                format_resolved_text(&ws.describe(node)?)
            }
            EditTarget::Default(DefaultTarget::File) => {
                ws.edit_default_file_flag(flag.parse::<FileFlag>()?, value);
                format!("Default file flag {} set to {}.", flag, value)
            }
            EditTarget::Default(DefaultTarget::Folder) => {
                ws.edit_default_folder_flag(flag.parse::<FolderFlag>()?, value);
                format!("Default folder flag {} set to {}.", flag, value)
            }
        };
        self.groups.save(dataroom, ws.group())?;
        Ok(described)
    }

    fn handle_group_command(
        &self,
        dataroom: &str,
        command: &GroupCommands,
    ) -> Result<String, ApiError> {
        match command {
            GroupCommands::List { format } => {
                let summaries = self.groups.summaries(dataroom)?;
                render(format, &summaries, || format_group_list_text(&summaries))
            }
            GroupCommands::Show { group, format } => {
                let group = self.groups.get(dataroom, group)?;
                render(format, &group, || format_group_detail_text(&group))
            }
            GroupCommands::Create {
                group,
                name,
                all_access,
            } => {
                let mut new_group = PermissionGroup::new(group.as_str(), name.as_str());
                new_group.all_access = *all_access;
                self.groups.create(dataroom, &new_group)?;
                Ok(format!("Created permission group: {}", group))
            }
            GroupCommands::Delete { group, force } => {
                if !force && !self.assume_yes {
                    use dialoguer::Confirm;
                    let confirmed = Confirm::new()
                        .with_prompt(format!("Delete permission group '{}'?", group))
                        .interact()
                        .map_err(|e| {
                            ApiError::ConfigError(format!("Failed to get user input: {}", e))
                        })?;
                    if !confirmed {
                        return Ok("Deletion cancelled".to_string());
                    }
                }
                self.groups.delete(dataroom, group)?;
                Ok(format!("Deleted permission group: {}", group))
            }
            GroupCommands::Assign { user, group, email } => {
                let mut collaborator = Collaborator::new(user.as_str(), group.as_str());
                collaborator.email = email.clone();
                self.groups.assign(dataroom, collaborator)?;
                Ok(format!("Assigned {} to {}", user, group))
            }
            GroupCommands::Unassign { user } => {
                if self.groups.unassign(dataroom, user)? {
                    Ok(format!("Unassigned {}", user))
                } else {
                    Ok(format!("{} was not assigned", user))
                }
            }
            GroupCommands::Collaborators { format } => {
                let collaborators = self.groups.collaborators(dataroom)?;
                render(format, &collaborators, || {
                    format_collaborators_text(&collaborators)
                })
            }
        }
    }

    fn workspace(
        &self,
        listing: &Path,
        group: PermissionGroup,
    ) -> Result<PermissionWorkspace, ApiError> {
        let listing = self.read_listing(listing)?;
        Ok(PermissionWorkspace::from_listing(&listing, group)
            .with_comparable_flags(self.config.permissions.comparable_flags.clone()))
    }

    /// Read a listing JSON file; relative paths resolve against the workspace root.
    fn read_listing(&self, path: &Path) -> Result<Listing, ApiError> {
        let path = if path.is_relative() {
            self.workspace_root.join(path)
        } else {
            path.to_path_buf()
        };
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ApiError::StorageError(StorageError::InvalidPath(format!(
                "Failed to read listing {}: {}",
                path.display(),
                e
            )))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ApiError::StorageError(StorageError::Serialization(format!(
                "Failed to parse listing {}: {}",
                path.display(),
                e
            )))
        })
    }
}

enum EditTarget<'a> {
    Node(&'a str),
    ChildTemplate(&'a str),
    Default(DefaultTarget),
}

impl<'a> EditTarget<'a> {
    fn from_args(
        node: Option<&'a str>,
        child: bool,
        default: Option<DefaultTarget>,
    ) -> Result<Self, ApiError> {
        match (node, default) {
            (Some(node), None) if child => Ok(EditTarget::ChildTemplate(node)),
            (Some(node), None) => Ok(EditTarget::Node(node)),
            (None, Some(target)) => Ok(EditTarget::Default(target)),
            _ => Err(ApiError::ConfigError(
                "edit needs exactly one of --node or --default".to_string(),
            )),
        }
    }
}

fn render<T: Serialize>(
    format: &str,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<String, ApiError> {
    match format {
        "json" => to_json(value),
        "text" => Ok(text()),
        other => Err(ApiError::ConfigError(format!(
            "Invalid output format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        ApiError::StorageError(StorageError::Serialization(format!(
            "Failed to serialize output: {}",
            e
        )))
    })
}
