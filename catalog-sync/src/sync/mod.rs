//! Row-by-row synchronisation of the catalog worksheet

pub mod batch;
pub mod report;
pub mod runner;

pub use report::SyncReport;
pub use runner::{SyncOptions, SyncRunner, resolve_headers};
