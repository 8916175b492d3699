//! Catalog rows and the payload built from them

pub mod mapper;
pub mod payload;
pub mod text;

pub use mapper::{RowMapper, RowSubmission, SkipReason};
