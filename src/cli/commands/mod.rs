//! CLI command handlers for `studytrack`.
//!
//! This module provides handlers for various CLI subcommands.
//! Each command is implemented in its own submodule.

pub mod config;
pub mod dashboard;
pub mod report;
