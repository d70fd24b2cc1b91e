//! Storage locations.

pub mod storage_paths;
