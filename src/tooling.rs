//! Tooling & Integration Layer
//!
//! Command-line access to the permission workspace and group storage.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, GroupCommands};
