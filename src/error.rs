//! Error types for the dataroom permission engine.

use thiserror::Error;

/// Storage-layer failures (filesystem, encoding).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors surfaced to callers of the library and the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Node {id} is not a {expected}")]
    WrongNodeKind { id: String, expected: &'static str },

    #[error("Group {0} is in general access mode; edit the defaults instead")]
    GeneralAccessMode(String),

    #[error("Permission group not found: {0}")]
    GroupNotFound(String),

    #[error("Permission group {group_id} is in use by: {}", users.join(", "))]
    GroupInUse { group_id: String, users: Vec<String> },

    #[error("Invalid permission group: {0}")]
    InvalidGroup(String),

    #[error("Invalid permission flag: {0}")]
    InvalidFlag(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::StorageError(StorageError::IoError(err))
    }
}
