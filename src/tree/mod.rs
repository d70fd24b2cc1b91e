//! Folder Tree Index
//!
//! Builds a navigable tree of folder and file nodes from flat listings and
//! maintains the id lookup and parent maps used by every permission operation.

pub mod builder;
pub mod index;
pub mod node;

pub use builder::{build_from_listing, build_tree, TreeBuilder};
pub use index::{NodeMove, ParentMap, TreeIndex};
pub use node::{path_segments, Listing, ListingRecord, Node, NodeKind};
