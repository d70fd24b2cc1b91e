//! Integration tests for the dataroom permission engine

mod cli_commands;
mod group_storage;
mod inheritance_scenarios;
mod support;
mod tree_determinism;
