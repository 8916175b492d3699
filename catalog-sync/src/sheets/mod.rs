//! Spreadsheet access
//!
//! The sync only needs three things from a spreadsheet: the header row, every
//! row, and a way to write a batch of single cells back. [`SheetSource`] is
//! that seam; Google Sheets and local CSV files implement it.

pub mod auth;
pub mod cell;
pub mod csv_file;
pub mod google;
pub mod headers;

use anyhow::Result;
use async_trait::async_trait;

pub use auth::{AccessToken, ServiceAccountKey};
pub use cell::{CellRef, PendingUpdate, column_letters};
pub use csv_file::CsvSheet;
pub use google::GoogleSheet;
pub use headers::{Column, HeaderMap, MissingHeaders};

/// A worksheet the sync reads from and writes back to
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Human readable location, used in log lines
    fn describe(&self) -> String;

    /// Raw cells of row 1
    async fn header_row(&self) -> Result<Vec<String>>;

    /// Every row including the header row; trailing blank cells may be omitted
    async fn all_rows(&self) -> Result<Vec<Vec<String>>>;

    /// Write every update in one call. Either the whole batch is applied or an
    /// error is returned.
    async fn batch_update(&self, updates: &[PendingUpdate]) -> Result<()>;
}
