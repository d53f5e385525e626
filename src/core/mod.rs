//! Core module: domain model, KPI engine, report assembly and persistence

pub mod config;
pub mod kpi;
pub mod models;
pub mod report;
pub mod storage;

/// Returns the current version of the `studytrack` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
