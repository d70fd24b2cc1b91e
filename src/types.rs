//! Core types shared by the tree index and the permission engine.

/// NodeId: stable identifier of a file or folder in a dataroom tree.
///
/// Backend ids are used verbatim; nodes without one get `path + name`.
pub type NodeId = String;

/// Id of the implicit node wrapping the dataroom top level.
pub const ROOT_ID: &str = "ROOT";

/// Path segment that listings may prefix every path with.
pub const ROOT_SEGMENT: &str = "Root";
