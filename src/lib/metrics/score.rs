//! Metrics for the `score` stage.

use serde::{Deserialize, Serialize};

use super::{Metric, ProcessingMetrics};
use crate::record::{AlignmentRecord, Status};

/// Counts of alignments seen and scored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringMetrics {
    /// Alignment records read from the input.
    pub records_read: u64,
    /// Reverse-strand records dropped by the forward-only filter.
    pub strand_filtered: u64,
    /// Input lines dropped for having too few columns.
    pub malformed_lines: u64,
    /// Records scored and written.
    pub records_scored: u64,
    /// Scored records with PASS status.
    pub pass: u64,
    /// Scored records with FAIL status.
    pub fail: u64,
    /// Scored records against a reference of unknown length.
    pub undefined_scores: u64,
}

impl ScoringMetrics {
    /// Creates zeroed metrics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one scored record.
    pub fn observe(&mut self, record: &AlignmentRecord) {
        self.records_scored += 1;
        match record.status {
            Status::Pass => self.pass += 1,
            Status::Fail => self.fail += 1,
        }
        if record.score_all.is_none() {
            self.undefined_scores += 1;
        }
    }
}

impl Metric for ScoringMetrics {
    fn metric_name() -> &'static str {
        "alignment scoring"
    }
}

impl ProcessingMetrics for ScoringMetrics {
    fn total_input(&self) -> u64 {
        self.records_read + self.malformed_lines
    }

    fn total_output(&self) -> u64 {
        self.records_scored
    }

    fn total_filtered(&self) -> u64 {
        self.strand_filtered + self.malformed_lines
    }
}
