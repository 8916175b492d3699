//! Per-run counters

use std::fmt;

use super::runner::RowOutcome;

/// Tally of row outcomes and write-back activity for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub rows_seen: usize,
    pub skipped: usize,
    pub mapping_failed: usize,
    pub recommendation_rejected: usize,
    pub registration_failed: usize,
    pub completed: usize,
    pub previewed: usize,
    pub flushes: usize,
    pub cells_written: usize,
}

impl SyncReport {
    pub fn record(&mut self, outcome: &RowOutcome) {
        self.rows_seen += 1;
        match outcome {
            RowOutcome::Skipped(_) => self.skipped += 1,
            RowOutcome::MappingFailed(_) => self.mapping_failed += 1,
            RowOutcome::RecommendationRejected(_) => self.recommendation_rejected += 1,
            RowOutcome::RegistrationFailed(_) => self.registration_failed += 1,
            RowOutcome::Completed => self.completed += 1,
            RowOutcome::Previewed => self.previewed += 1,
        }
    }

    /// Rows that were abandoned after an error
    pub fn failed(&self) -> usize {
        self.mapping_failed + self.recommendation_rejected + self.registration_failed
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows: {} completed, {} skipped, {} failed ({} mapping, {} recommendation, {} registration)",
            self.rows_seen,
            self.completed,
            self.skipped,
            self.failed(),
            self.mapping_failed,
            self.recommendation_rejected,
            self.registration_failed
        )?;
        if self.previewed > 0 {
            write!(f, ", {} previewed", self.previewed)?;
        }
        write!(f, "; {} cells written in {} batches", self.cells_written, self.flushes)
    }
}
