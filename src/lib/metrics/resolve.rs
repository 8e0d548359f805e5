//! Metrics for the `resolve` stage.

use serde::{Deserialize, Serialize};

use super::{Metric, ProcessingMetrics};
use crate::resolver::{ResolutionMode, ResolvedAssignment};

/// Counts of barcodes by resolution outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionMetrics {
    /// Barcodes resolved.
    pub barcodes: u64,
    /// Barcodes with a single candidate.
    pub single: u64,
    /// Multi-candidate barcodes collapsed to one winner.
    pub collapsed: u64,
    /// Multi-candidate barcodes kept ambiguous.
    pub ambiguous: u64,
    /// Collapses that only the same-lineage threshold allowed.
    pub lineage_collapsed: u64,
    /// Barcodes written to the assignment table.
    pub assigned: u64,
}

impl ResolutionMetrics {
    /// Creates zeroed metrics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one resolved barcode.
    pub fn observe(&mut self, resolved: &ResolvedAssignment) {
        self.barcodes += 1;
        match resolved.mode {
            ResolutionMode::Single => self.single += 1,
            ResolutionMode::CollapsedWinner => self.collapsed += 1,
            ResolutionMode::KeptAmbiguous => self.ambiguous += 1,
        }
        if resolved.lineage_collapse {
            self.lineage_collapsed += 1;
        }
    }
}

impl Metric for ResolutionMetrics {
    fn metric_name() -> &'static str {
        "conflict resolution"
    }
}

impl ProcessingMetrics for ResolutionMetrics {
    fn total_input(&self) -> u64 {
        self.barcodes
    }

    fn total_output(&self) -> u64 {
        self.single + self.collapsed
    }

    fn total_filtered(&self) -> u64 {
        self.ambiguous
    }
}
