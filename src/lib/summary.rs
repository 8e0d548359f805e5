//! Summaries of grouped barcodes.
//!
//! Two tables are derived from the grouper output: how many passing single-candidate barcodes
//! support each oligo, and a histogram of barcode coverage suitable as the `-H` input of a
//! library-complexity extrapolation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::grouper::{BarcodeGroup, GroupFlag};

/// Barcode support for one oligo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OligoSupportRow {
    /// Oligo id.
    pub oligo: String,
    /// Passing single-candidate barcodes assigned to the oligo.
    pub barcodes: u64,
    /// Summed coverage of those barcodes.
    pub coverage: u64,
}

/// One bin of the coverage histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageHistogramRow {
    /// Total coverage of a barcode.
    pub coverage: u64,
    /// Number of barcodes with that coverage.
    pub barcodes: u64,
}

/// Accumulates oligo support and the coverage histogram over a stream of groups.
#[derive(Debug, Default)]
pub struct GroupSummary {
    support: BTreeMap<String, (u64, u64)>,
    histogram: BTreeMap<u64, u64>,
}

impl GroupSummary {
    /// Creates an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one barcode.
    pub fn add(&mut self, group: &BarcodeGroup) {
        *self.histogram.entry(group.total).or_default() += 1;

        if group.flag == GroupFlag::Pass {
            for candidate in &group.candidates {
                let entry = self.support.entry(candidate.id.to_string()).or_default();
                entry.0 += 1;
                entry.1 += group.total;
            }
        }
    }

    /// Oligo support rows, sorted by oligo id.
    #[must_use]
    pub fn oligo_support(&self) -> Vec<OligoSupportRow> {
        self.support
            .iter()
            .map(|(oligo, &(barcodes, coverage))| OligoSupportRow {
                oligo: oligo.clone(),
                barcodes,
                coverage,
            })
            .collect()
    }

    /// Coverage histogram rows, ascending by coverage.
    #[must_use]
    pub fn coverage_histogram(&self) -> Vec<CoverageHistogramRow> {
        self.histogram
            .iter()
            .map(|(&coverage, &barcodes)| CoverageHistogramRow { coverage, barcodes })
            .collect()
    }

    /// Number of barcodes added.
    #[must_use]
    pub fn barcodes(&self) -> u64 {
        self.histogram.values().sum()
    }
}
