//! Library crate for `studytrack`
//! Contains the domain model, KPI engine, report assembly, persistence and
//! configuration shared by the CLI binary and the integration tests.

pub mod core;
pub mod logger;

pub use core::config;
pub use core::get_version;
