//! Permission Model
//!
//! Value shapes for file and folder permissions, their partial stored records,
//! default templates and permission groups. Pure data; resolution lives in
//! [`crate::resolver`].

pub mod flags;
pub mod group;
pub mod record;

pub use flags::{
    ComparableFlags, FileFlag, FileOverrides, FilePermission, FolderAccess, FolderFlag,
    FolderOverrides, FolderPermission,
};
pub use group::{Collaborator, PermissionGroup};
pub use record::{
    FilePermissionRecord, FolderPermissionRecord, PermissionDefaults, PermissionMap,
    PermissionRecord,
};
