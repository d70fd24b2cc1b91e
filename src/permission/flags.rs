//! Permission flag sets.
//!
//! Each flag family is generated from one table so that the flag enum, the
//! complete record and the partial override record can never drift apart.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};

macro_rules! permission_flags {
    (
        $(#[$flag_meta:meta])*
        flag $flag:ident;
        $(#[$full_meta:meta])*
        full $full:ident;
        $(#[$over_meta:meta])*
        overrides $over:ident;
        { $( $variant:ident => $field:ident : $name:literal ),+ $(,)? }
    ) => {
        $(#[$flag_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $flag {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl $flag {
            /// Every flag of this family, in declaration order.
            pub const ALL: &'static [$flag] = &[$($flag::$variant),+];

            /// Wire name of the flag (camelCase).
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($flag::$variant => $name,)+
                }
            }
        }

        impl std::fmt::Display for $flag {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $flag {
            type Err = ApiError;

            /// Accepts the camelCase wire name or the snake_case field name.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s == $name || s == stringify!($field) {
                        return Ok($flag::$variant);
                    }
                )+
                Err(ApiError::InvalidFlag(s.to_string()))
            }
        }

        $(#[$full_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $full {
            $(pub $field: bool,)+
        }

        impl $full {
            pub fn get(&self, flag: $flag) -> bool {
                match flag {
                    $($flag::$variant => self.$field,)+
                }
            }

            pub fn set(&mut self, flag: $flag, value: bool) {
                match flag {
                    $($flag::$variant => self.$field = value,)+
                }
            }

            /// Record with every flag set to `value`.
            pub fn uniform(value: bool) -> Self {
                Self {
                    $($field: value,)+
                }
            }

            /// Flags whose values differ between `self` and `other`, restricted to `flags`.
            pub fn differing(&self, other: &Self, flags: &[$flag]) -> Vec<$flag> {
                flags
                    .iter()
                    .copied()
                    .filter(|flag| self.get(*flag) != other.get(*flag))
                    .collect()
            }
        }

        $(#[$over_meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $over {
            $(
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<bool>,
            )+
        }

        impl $over {
            pub fn get(&self, flag: $flag) -> Option<bool> {
                match flag {
                    $($flag::$variant => self.$field,)+
                }
            }

            pub fn set(&mut self, flag: $flag, value: Option<bool>) {
                match flag {
                    $($flag::$variant => self.$field = value,)+
                }
            }

            /// Fill every unset flag from `base`.
            pub fn merge_over(&self, base: &$full) -> $full {
                $full {
                    $($field: self.$field.unwrap_or(base.$field),)+
                }
            }

            /// Override record pinning every flag to the values of `full`.
            pub fn pinned(full: &$full) -> Self {
                Self {
                    $($field: Some(full.$field),)+
                }
            }

            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())+
            }
        }
    };
}

permission_flags! {
    /// Flags governing what a collaborator may do with a single file.
    flag FileFlag;
    /// Complete file permission; also used as a folder's child file standard.
    full FilePermission;
    /// Partially authored file permission; unset flags come from a template.
    overrides FileOverrides;
    {
        ViewAccess => view_access: "viewAccess",
        DownloadAccess => download_access: "downloadAccess",
        EditAccess => edit_access: "editAccess",
        DeleteAccess => delete_access: "deleteAccess",
        MoveAccess => move_access: "moveAccess",
        RenameAccess => rename_access: "renameAccess",
        WatermarkContent => watermark_content: "watermarkContent",
        ViewComments => view_comments: "viewComments",
        AddComments => add_comments: "addComments",
        ViewTags => view_tags: "viewTags",
        AddTags => add_tags: "addTags",
        CanQuery => can_query: "canQuery",
        IsVisible => is_visible: "isVisible",
    }
}

permission_flags! {
    /// Flags governing folder-level operations.
    flag FolderFlag;
    /// Complete folder-level access flags.
    full FolderAccess;
    /// Partially authored folder access flags.
    overrides FolderOverrides;
    {
        AllowUploads => allow_uploads: "allowUploads",
        CreateFolders => create_folders: "createFolders",
        ViewContents => view_contents: "viewContents",
        MoveContents => move_contents: "moveContents",
        RenameContents => rename_contents: "renameContents",
        DeleteContents => delete_contents: "deleteContents",
        ViewComments => view_comments: "viewComments",
        AddComments => add_comments: "addComments",
        ViewTags => view_tags: "viewTags",
        AddTags => add_tags: "addTags",
        CanQuery => can_query: "canQuery",
        IsVisible => is_visible: "isVisible",
    }
}

impl Default for FilePermission {
    /// Read-only: viewing is granted, every mutating flag is denied.
    fn default() -> Self {
        let mut perms = FilePermission::uniform(false);
        perms.view_access = true;
        perms.view_comments = true;
        perms.view_tags = true;
        perms.is_visible = true;
        perms
    }
}

impl Default for FolderAccess {
    fn default() -> Self {
        let mut access = FolderAccess::uniform(false);
        access.view_contents = true;
        access.view_comments = true;
        access.view_tags = true;
        access.is_visible = true;
        access
    }
}

/// Folder permission: folder-level flags plus the child file standard applied
/// to descendant files that are not customized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderPermission {
    pub access: FolderAccess,
    pub child_file_perms: FilePermission,
}

impl FolderPermission {
    pub fn get(&self, flag: FolderFlag) -> bool {
        self.access.get(flag)
    }

    pub fn set(&mut self, flag: FolderFlag, value: bool) {
        self.access.set(flag, value);
    }
}

/// Subset of file flags considered when deciding whether a file deviates
/// from its folder's child file standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparableFlags(Vec<FileFlag>);

impl ComparableFlags {
    pub fn new(flags: impl IntoIterator<Item = FileFlag>) -> Self {
        let mut flags: Vec<FileFlag> = flags.into_iter().collect();
        flags.sort();
        flags.dedup();
        Self(flags)
    }

    /// Every file flag takes part in the comparison.
    pub fn all() -> Self {
        Self(FileFlag::ALL.to_vec())
    }

    pub fn as_slice(&self) -> &[FileFlag] {
        &self.0
    }

    pub fn contains(&self, flag: FileFlag) -> bool {
        self.0.contains(&flag)
    }
}

impl Default for ComparableFlags {
    /// `viewAccess` and `watermarkContent` are excluded.
    fn default() -> Self {
        Self::new(
            FileFlag::ALL
                .iter()
                .copied()
                .filter(|f| !matches!(f, FileFlag::ViewAccess | FileFlag::WatermarkContent)),
        )
    }
}
