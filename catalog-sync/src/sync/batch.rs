//! Batched write-back of processed rows

use anyhow::{Context, Result};

use crate::catalog::RowSubmission;
use crate::sheets::{CellRef, Column, HeaderMap, PendingUpdate, SheetSource};

/// Queued cells that trigger a flush (25 rows, two cells each)
pub const FLUSH_THRESHOLD: usize = 50;

/// Ordered queue of cell writes, flushed to the sheet in bounded batches
#[derive(Debug)]
pub struct WriteBackBatcher {
    pending: Vec<PendingUpdate>,
    threshold: usize,
    flushes: usize,
    cells_written: usize,
}

impl Default for WriteBackBatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteBackBatcher {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            threshold: FLUSH_THRESHOLD,
            flushes: 0,
            cells_written: 0,
        }
    }

    /// Queue the payload text and derived URL for a completed row
    pub fn queue_row(&mut self, headers: &HeaderMap, submission: &RowSubmission) {
        self.pending.push(PendingUpdate::new(
            CellRef::new(submission.row, headers.index(Column::Payload)),
            submission.text.clone(),
        ));
        self.pending.push(PendingUpdate::new(
            CellRef::new(submission.row, headers.index(Column::FullUrl)),
            submission.full_url.clone(),
        ));
    }

    #[cfg(test)]
    pub fn pending(&self) -> &[PendingUpdate] {
        &self.pending
    }

    pub fn is_full(&self) -> bool {
        self.pending.len() >= self.threshold
    }

    /// Flush only once the threshold has been reached
    pub async fn flush_if_full<S: SheetSource + ?Sized>(&mut self, sheet: &S) -> Result<()> {
        if self.is_full() {
            self.flush(sheet).await?;
        }
        Ok(())
    }

    /// Write all queued cells in one call and clear the queue
    pub async fn flush<S: SheetSource + ?Sized>(&mut self, sheet: &S) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let count = self.pending.len();
        sheet
            .batch_update(&self.pending)
            .await
            .with_context(|| format!("Failed to write {} cells to {}", count, sheet.describe()))?;

        log::info!("Wrote {} cells to {}", count, sheet.describe());
        self.pending.clear();
        self.flushes += 1;
        self.cells_written += count;
        Ok(())
    }

    /// Number of successful flushes so far
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn cells_written(&self) -> usize {
        self.cells_written
    }
}
