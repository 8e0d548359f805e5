//! Metrics for the `group` stage.

use serde::{Deserialize, Serialize};

use super::{Metric, ProcessingMetrics};
use crate::grouper::{BarcodeGroup, GroupFlag};

/// Counts of records grouped and barcodes emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingMetrics {
    /// Scored records folded into groups.
    pub records_read: u64,
    /// Input lines dropped for having the wrong number of columns.
    pub malformed_lines: u64,
    /// Barcode groups emitted.
    pub barcodes: u64,
    /// Barcodes with more than one candidate.
    pub collisions: u64,
    /// Single-candidate barcodes with a PASSing alignment.
    pub passing: u64,
    /// Single-candidate barcodes without a PASSing alignment.
    pub failing: u64,
}

impl GroupingMetrics {
    /// Creates zeroed metrics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one emitted group.
    pub fn observe(&mut self, group: &BarcodeGroup) {
        self.barcodes += 1;
        match group.flag {
            GroupFlag::Pass => self.passing += 1,
            GroupFlag::Collision => self.collisions += 1,
            GroupFlag::Fail => self.failing += 1,
        }
    }
}

impl Metric for GroupingMetrics {
    fn metric_name() -> &'static str {
        "barcode grouping"
    }
}

impl ProcessingMetrics for GroupingMetrics {
    fn total_input(&self) -> u64 {
        self.records_read + self.malformed_lines
    }

    fn total_output(&self) -> u64 {
        self.barcodes
    }

    fn total_filtered(&self) -> u64 {
        self.malformed_lines
    }
}
