//! Final barcode to oligo assignment table.
//!
//! The [`AssignmentLedger`] records, for every confidently resolved barcode, the oligo it maps
//! to together with the alignment facts that support it, and the barcode's coverage per sample.
//! Insertion is checked: a barcode may be recorded once per sample, and every sample must agree
//! on its facts.

use std::path::Path;

use ahash::AHashMap;
use anyhow::{Context, Result as AnyhowResult};
use clap::ValueEnum;
use fgoxide::io::DelimFile;
use serde::{Deserialize, Serialize};

use crate::candidate::UNMAPPED_PLACEHOLDER;
use crate::errors::{MpraError, Result};
use crate::resolver::ResolvedAssignment;

/// Default maximum best score for a barcode to enter the table.
pub const DEFAULT_MAX_ERROR: f64 = 0.05;

/// Output schema of the assignment table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AssignmentColumns {
    /// `Barcode, Oligo, Coverage`.
    #[default]
    Minimal,
    /// `Barcode, Oligo, Error, Coverage`.
    Scored,
    /// `Barcode, Oligo, Error, CIGAR, cs, Aln_Start:Stop, Coverage`.
    Full,
}

/// Row of the `minimal` schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimalRow {
    /// Barcode.
    #[serde(rename = "Barcode")]
    pub barcode: String,
    /// Assigned oligo.
    #[serde(rename = "Oligo")]
    pub oligo: String,
    /// Coverage in the sample.
    #[serde(rename = "Coverage")]
    pub coverage: u64,
}

/// Row of the `scored` schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRow {
    /// Barcode.
    #[serde(rename = "Barcode")]
    pub barcode: String,
    /// Assigned oligo.
    #[serde(rename = "Oligo")]
    pub oligo: String,
    /// Best alignment score, three decimals.
    #[serde(rename = "Error")]
    pub error: String,
    /// Coverage in the sample.
    #[serde(rename = "Coverage")]
    pub coverage: u64,
}

/// Row of the `full` schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullRow {
    /// Barcode.
    #[serde(rename = "Barcode")]
    pub barcode: String,
    /// Assigned oligo.
    #[serde(rename = "Oligo")]
    pub oligo: String,
    /// Best alignment score, three decimals.
    #[serde(rename = "Error")]
    pub error: String,
    /// Best alignment CIGAR.
    #[serde(rename = "CIGAR")]
    pub cigar: String,
    /// Best alignment cs tag.
    pub cs: String,
    /// Best alignment span.
    #[serde(rename = "Aln_Start:Stop")]
    pub position: String,
    /// Coverage in the sample.
    #[serde(rename = "Coverage")]
    pub coverage: u64,
}

/// The alignment facts recorded for a barcode.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentFacts {
    /// Assigned oligo.
    pub oligo: String,
    /// Best alignment score.
    pub score: f64,
    /// Best alignment CIGAR.
    pub cigar: String,
    /// Best alignment cs tag.
    pub cs: String,
    /// Best alignment span.
    pub position: String,
}

impl AssignmentFacts {
    fn error(&self) -> String {
        format!("{:.3}", self.score)
    }

    /// The first attribute that differs from `other`, as `(column, ours, theirs)`.
    fn first_difference(&self, other: &Self) -> Option<(&'static str, String, String)> {
        if self.oligo != other.oligo {
            return Some(("Oligo", self.oligo.clone(), other.oligo.clone()));
        }
        if self.error() != other.error() {
            return Some(("Error", self.error(), other.error()));
        }
        if self.cigar != other.cigar {
            return Some(("CIGAR", self.cigar.clone(), other.cigar.clone()));
        }
        if self.cs != other.cs {
            return Some(("cs", self.cs.clone(), other.cs.clone()));
        }
        if self.position != other.position {
            return Some(("Aln_Start:Stop", self.position.clone(), other.position.clone()));
        }
        None
    }
}

#[derive(Debug)]
struct LedgerEntry {
    barcode: String,
    facts: AssignmentFacts,
    coverage: AHashMap<String, u64>,
}

/// Barcode-keyed assignment facts with per-sample coverage, in first-insertion order.
#[derive(Debug, Default)]
pub struct AssignmentLedger {
    entries: Vec<LedgerEntry>,
    index: AHashMap<String, usize>,
}

impl AssignmentLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a barcode's facts and coverage for one sample.
    ///
    /// # Errors
    ///
    /// Returns [`MpraError::DuplicateBarcode`] if the barcode is already recorded for the
    /// sample, and [`MpraError::InconsistentAssignment`] if its facts differ from those
    /// already recorded.
    pub fn insert(
        &mut self,
        sample: &str,
        barcode: &str,
        facts: AssignmentFacts,
        coverage: u64,
    ) -> Result<()> {
        let Some(&i) = self.index.get(barcode) else {
            self.index.insert(barcode.to_string(), self.entries.len());
            self.entries.push(LedgerEntry {
                barcode: barcode.to_string(),
                facts,
                coverage: AHashMap::from_iter([(sample.to_string(), coverage)]),
            });
            return Ok(());
        };

        let entry = &mut self.entries[i];
        if entry.coverage.contains_key(sample) {
            return Err(MpraError::DuplicateBarcode {
                barcode: barcode.to_string(),
                sample: sample.to_string(),
            });
        }
        if let Some((field, existing, incoming)) = entry.facts.first_difference(&facts) {
            return Err(MpraError::InconsistentAssignment {
                barcode: barcode.to_string(),
                field: field.to_string(),
                existing,
                incoming,
            });
        }
        entry.coverage.insert(sample.to_string(), coverage);
        Ok(())
    }

    /// Records a resolved barcode if it qualifies for the table.
    ///
    /// Ambiguous barcodes, barcodes whose best score exceeds `max_error`, and barcodes assigned
    /// to the unmapped placeholder are skipped. Returns true if the barcode was recorded.
    ///
    /// # Errors
    ///
    /// See [`AssignmentLedger::insert`].
    pub fn record_resolved(
        &mut self,
        sample: &str,
        resolved: &ResolvedAssignment,
        max_error: f64,
    ) -> Result<bool> {
        let Some(winner) = resolved.winner() else {
            return Ok(false);
        };
        let score = winner.best.score;
        if !score.is_finite() || score > max_error || winner.id.as_str() == UNMAPPED_PLACEHOLDER {
            return Ok(false);
        }

        let facts = AssignmentFacts {
            oligo: winner.id.to_string(),
            score: winner.best.score,
            cigar: winner.best.cigar.clone(),
            cs: winner.best.cs.clone(),
            position: winner.best.position.to_string(),
        };
        self.insert(sample, &resolved.group.barcode, facts, winner.coverage)?;
        Ok(true)
    }

    /// Number of barcodes recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no barcode is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Coverage of a barcode in a sample; 0 if not recorded.
    #[must_use]
    pub fn coverage(&self, barcode: &str, sample: &str) -> u64 {
        self.index
            .get(barcode)
            .and_then(|&i| self.entries[i].coverage.get(sample).copied())
            .unwrap_or(0)
    }

    /// Writes the ledger as a TSV with the given schema, reporting coverage for `sample`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_tsv(
        &self,
        path: &Path,
        columns: AssignmentColumns,
        sample: &str,
    ) -> AnyhowResult<()> {
        let coverage = |e: &LedgerEntry| e.coverage.get(sample).copied().unwrap_or(0);
        let delim = DelimFile::default();
        let written = match columns {
            AssignmentColumns::Minimal => delim.write_tsv(
                &path,
                self.entries.iter().map(|e| MinimalRow {
                    barcode: e.barcode.clone(),
                    oligo: e.facts.oligo.clone(),
                    coverage: coverage(e),
                }),
            ),
            AssignmentColumns::Scored => delim.write_tsv(
                &path,
                self.entries.iter().map(|e| ScoredRow {
                    barcode: e.barcode.clone(),
                    oligo: e.facts.oligo.clone(),
                    error: e.facts.error(),
                    coverage: coverage(e),
                }),
            ),
            AssignmentColumns::Full => delim.write_tsv(
                &path,
                self.entries.iter().map(|e| FullRow {
                    barcode: e.barcode.clone(),
                    oligo: e.facts.oligo.clone(),
                    error: e.facts.error(),
                    cigar: e.facts.cigar.clone(),
                    cs: e.facts.cs.clone(),
                    position: e.facts.position.clone(),
                    coverage: coverage(e),
                }),
            ),
        };
        written.with_context(|| format!("Failed to write assignment table: {}", path.display()))
    }
}
