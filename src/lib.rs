//! Dataroom: permission inheritance and overrides for dataroom trees
//!
//! Builds a folder/file tree from flat listings, resolves effective file and
//! folder permissions through folder child-file standards, tracks files that
//! deviate from their folder, and persists permission groups.

pub mod concurrency;
pub mod config;
pub mod deviation;
pub mod error;
pub mod group;
pub mod logging;
pub mod permission;
pub mod resolver;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod visibility;
pub mod workspace;
