//! Workspace domain: owned editing state, command output types and text formatting.

mod controller;
mod format;
mod types;

pub use controller::PermissionWorkspace;
pub use format::*;
pub use types::*;
