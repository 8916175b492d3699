//! The row-processing loop
//!
//! Rows are handled one at a time in sheet order. Each row ends in exactly one
//! [`RowOutcome`]; only an unreachable registration endpoint (when configured
//! to abort) or a failed write-back stops the run.

use anyhow::{Context, Result};

use super::batch::WriteBackBatcher;
use super::report::SyncReport;
use crate::api::{Dispatcher, PayloadPoster, RecommendationOutcome};
use crate::catalog::{RowMapper, SkipReason};
use crate::sheets::{HeaderMap, SheetSource};

/// Terminal state of one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Skipped(SkipReason),
    MappingFailed(String),
    RecommendationRejected(String),
    /// Only produced when registration failures do not abort the run
    RegistrationFailed(String),
    Completed,
    /// Dry run: mapped but not submitted
    Previewed,
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Map and log rows without calling the APIs or writing back
    pub dry_run: bool,
    /// Stop once this many rows have been completed (or previewed)
    pub limit: Option<usize>,
    pub abort_on_registration_error: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            limit: None,
            abort_on_registration_error: true,
        }
    }
}

/// Read row 1 and resolve the required columns.
///
/// A [`crate::sheets::MissingHeaders`] error is returned unchanged so callers
/// can downcast it.
pub async fn resolve_headers<S: SheetSource + ?Sized>(sheet: &S) -> Result<HeaderMap> {
    let header_row = sheet
        .header_row()
        .await
        .with_context(|| format!("Failed to read header row of {}", sheet.describe()))?;

    let headers = HeaderMap::resolve(&header_row)?;
    log::info!("Sheet headers (lowercased): {:?}", headers.normalized());
    Ok(headers)
}

pub struct SyncRunner<'a, S: ?Sized, P> {
    sheet: &'a S,
    dispatcher: &'a Dispatcher<P>,
    mapper: RowMapper,
    options: SyncOptions,
}

impl<'a, S, P> SyncRunner<'a, S, P>
where
    S: SheetSource + ?Sized,
    P: PayloadPoster,
{
    pub fn new(
        sheet: &'a S,
        dispatcher: &'a Dispatcher<P>,
        mapper: RowMapper,
        options: SyncOptions,
    ) -> Self {
        Self {
            sheet,
            dispatcher,
            mapper,
            options,
        }
    }

    /// Process every data row, then flush whatever is still queued
    pub async fn run(&self) -> Result<SyncReport> {
        let rows = self
            .sheet
            .all_rows()
            .await
            .with_context(|| format!("Failed to read rows of {}", self.sheet.describe()))?;

        log::info!(
            "Processing {} rows from {}",
            rows.len().saturating_sub(1),
            self.sheet.describe()
        );

        let mut batcher = WriteBackBatcher::new();
        let mut report = SyncReport::default();

        for (offset, row) in rows.iter().enumerate().skip(1) {
            if let Some(limit) = self.options.limit {
                if report.completed + report.previewed >= limit {
                    log::info!("Reached limit of {} rows, stopping", limit);
                    break;
                }
            }

            let row_index = offset as u32 + 1;
            let outcome = self.process_row(row_index, row, &mut batcher).await?;
            report.record(&outcome);
        }

        batcher.flush(self.sheet).await?;
        report.flushes = batcher.flushes();
        report.cells_written = batcher.cells_written();

        log::info!("Sync finished: {}", report);
        Ok(report)
    }

    async fn process_row(
        &self,
        row_index: u32,
        row: &[String],
        batcher: &mut WriteBackBatcher,
    ) -> Result<RowOutcome> {
        if let Some(reason) = self.mapper.skip_reason(row) {
            log::info!("[Row {}] Skipped: {}", row_index, reason);
            return Ok(RowOutcome::Skipped(reason));
        }

        let submission = match self.mapper.map(row_index, row) {
            Ok(submission) => submission,
            Err(e) => {
                log::warn!("[Row {}] Error processing row: {:#}", row_index, e);
                return Ok(RowOutcome::MappingFailed(format!("{:#}", e)));
            }
        };

        if self.options.dry_run {
            log::info!(
                "[Row {}] Dry run, would submit '{}': {}",
                row_index,
                submission.payload.title,
                submission.text
            );
            return Ok(RowOutcome::Previewed);
        }

        match self.dispatcher.recommend(&submission).await {
            RecommendationOutcome::Accepted => {
                log::info!("[Row {}] Recommendation API call successful", row_index);
            }
            RecommendationOutcome::Rejected { status, body } => {
                log::warn!(
                    "[Row {}] Recommendation API failed ({}): {}",
                    row_index,
                    status,
                    body
                );
                return Ok(RowOutcome::RecommendationRejected(format!("HTTP {}", status)));
            }
            RecommendationOutcome::Failed(error) => {
                log::warn!("[Row {}] Recommendation API call error: {}", row_index, error);
                return Ok(RowOutcome::RecommendationRejected(error));
            }
        }

        if let Err(e) = self.dispatcher.register(&submission).await {
            if self.options.abort_on_registration_error {
                return Err(e);
            }
            log::warn!("[Row {}] Registration API call error: {:#}", row_index, e);
            return Ok(RowOutcome::RegistrationFailed(format!("{:#}", e)));
        }

        batcher.queue_row(self.mapper.headers(), &submission);
        batcher.flush_if_full(self.sheet).await?;

        log::info!("[Row {}] Payload sent successfully", row_index);
        Ok(RowOutcome::Completed)
    }
}
