//! Common CLI options shared across commands.
//!
//! This module provides shared argument structures that can be composed into
//! command structs using `#[command(flatten)]`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use log::info;

use mpramap_lib::grouper::{GroupingFields, RecordField};
use mpramap_lib::io::is_stdin_path;
use mpramap_lib::ledger::{AssignmentColumns, DEFAULT_MAX_ERROR};
use mpramap_lib::lineage::LineageIndex;
use mpramap_lib::metrics::{Metric, write_metrics_auto};
use mpramap_lib::resolver::{
    ConflictResolver, DEFAULT_AMBIGUITY_RATIO, DEFAULT_SAME_LINEAGE_RATIO, ResolverConfig,
};
use mpramap_lib::scorer::{DEFAULT_SCORE_CUTOFF, ScorerConfig, ScoringMode};
use mpramap_lib::validation::{validate_file_exists, validate_fraction};

/// Input/output options for commands that read and write line-oriented text.
#[derive(Debug, Clone, Args)]
pub struct TsvIoOptions {
    /// Input file; `-` for stdin. Gzipped if the name ends in `.gz`
    #[arg(short = 'i', long = "input", default_value = "-")]
    pub input: PathBuf,

    /// Output file; `-` for stdout. Gzipped if the name ends in `.gz`
    #[arg(short = 'o', long = "output", default_value = "-")]
    pub output: PathBuf,
}

impl TsvIoOptions {
    /// Validates that the input file exists (skipped for stdin paths).
    ///
    /// # Errors
    ///
    /// Returns an error if the input file does not exist.
    pub fn validate(&self, description: &str) -> Result<()> {
        if !is_stdin_path(&self.input) {
            validate_file_exists(&self.input, description)?;
        }
        Ok(())
    }
}

/// Options for writing a stage's metrics to a file.
#[derive(Debug, Clone, Default, Args)]
pub struct MetricsOptions {
    /// Optional output TSV for the stage metrics
    #[arg(long = "metrics")]
    pub metrics: Option<PathBuf>,
}

impl MetricsOptions {
    /// Writes `metrics` if a metrics path was given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write<T: Metric>(&self, metrics: &T) -> Result<()> {
        if let Some(path) = &self.metrics {
            write_metrics_auto(path, metrics)?;
            info!("Wrote {} metrics to {}", T::metric_name(), path.display());
        }
        Ok(())
    }
}

/// Options for the alignment scorer.
#[derive(Debug, Clone, Args)]
pub struct ScoringOptions {
    /// Maximum score_all for an alignment to PASS
    #[arg(short = 'c', long = "cutoff", default_value_t = DEFAULT_SCORE_CUTOFF)]
    pub cutoff: f64,

    /// Source of substitution counts: the cs tag or `X` operations in the CIGAR
    #[arg(long = "scoring-mode", value_enum, default_value_t = ScoringMode::Cs)]
    pub mode: ScoringMode,

    /// Drop reverse-strand alignments instead of scoring them against the reverse reference
    #[arg(long = "forward-only", default_value_t = false)]
    pub forward_only: bool,
}

impl ScoringOptions {
    /// Validates the options and builds the scorer configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the cutoff is not in [0, 1].
    pub fn to_config(&self) -> Result<ScorerConfig> {
        validate_fraction(self.cutoff, "cutoff")?;
        Ok(ScorerConfig { cutoff: self.cutoff, mode: self.mode, forward_only: self.forward_only })
    }
}

/// Options for the barcode grouper.
#[derive(Debug, Clone, Args)]
pub struct GroupingOptions {
    /// Scored column that identifies a barcode; input must be sorted on it
    #[arg(long = "group-by", value_enum, default_value_t = RecordField::BarcodeId)]
    pub key: RecordField,

    /// Scored column that identifies a candidate oligo
    #[arg(long = "candidate-field", value_enum, default_value_t = RecordField::TaggedReference)]
    pub candidate: RecordField,
}

impl GroupingOptions {
    /// Builds the grouping field selection.
    #[must_use]
    pub fn to_fields(&self) -> GroupingFields {
        GroupingFields { key: self.key, candidate: self.candidate }
    }
}

/// Options for the conflict resolver and the assignment table.
#[derive(Debug, Clone, Args)]
pub struct ResolutionOptions {
    /// Oligo attributes TSV with `ID` and `sat_ref_parent` columns; enables saturation mode
    #[arg(short = 'l', long = "lineage-index")]
    pub lineage_index: Option<PathBuf>,

    /// Require a lineage index; fail before reading any input if none is given
    #[arg(long = "saturation", default_value_t = false)]
    pub saturation: bool,

    /// Coverage ratio above which a competing candidate keeps a barcode ambiguous
    #[arg(long = "ambiguity-ratio", default_value_t = DEFAULT_AMBIGUITY_RATIO)]
    pub ambiguity_ratio: f64,

    /// Coverage ratio above which a same-lineage competitor keeps a barcode ambiguous
    #[arg(long = "same-lineage-ratio", default_value_t = DEFAULT_SAME_LINEAGE_RATIO)]
    pub same_lineage_ratio: f64,

    /// Optional barcode to oligo assignment table
    #[arg(short = 'a', long = "assignments")]
    pub assignments: Option<PathBuf>,

    /// Maximum best score for a barcode to enter the assignment table
    #[arg(long = "max-error", default_value_t = DEFAULT_MAX_ERROR)]
    pub max_error: f64,

    /// Columns of the assignment table
    #[arg(long = "assignment-columns", value_enum, default_value_t = AssignmentColumns::Minimal)]
    pub assignment_columns: AssignmentColumns,

    /// Sample name the assignment table coverage is recorded under
    #[arg(long = "sample", default_value = "sample")]
    pub sample: String,
}

impl ResolutionOptions {
    /// Validates the options and loads the lineage index, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if a ratio is out of range, saturation mode was requested without a
    /// lineage index, or the lineage index cannot be loaded.
    pub fn build_resolver(&self) -> Result<ConflictResolver> {
        validate_fraction(self.ambiguity_ratio, "ambiguity-ratio")?;
        validate_fraction(self.same_lineage_ratio, "same-lineage-ratio")?;
        validate_fraction(self.max_error, "max-error")?;

        let saturation = match &self.lineage_index {
            Some(path) => Some(load_lineage_index(path)?),
            None if self.saturation => {
                bail!("--saturation requires --lineage-index");
            }
            None => None,
        };

        Ok(ConflictResolver::new(ResolverConfig {
            saturation,
            ambiguity_ratio: self.ambiguity_ratio,
            same_lineage_ratio: self.same_lineage_ratio,
        }))
    }

    /// Writes the assignment table, if one was requested.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be written.
    pub fn write_assignments(
        &self,
        ledger: Option<&mpramap_lib::ledger::AssignmentLedger>,
    ) -> Result<()> {
        if let (Some(path), Some(ledger)) = (&self.assignments, ledger) {
            ledger.write_tsv(path, self.assignment_columns, &self.sample)?;
            info!("Wrote {} barcode assignments to {}", ledger.len(), path.display());
        }
        Ok(())
    }
}

fn load_lineage_index(path: &Path) -> Result<LineageIndex> {
    validate_file_exists(path, "Lineage index")?;
    LineageIndex::from_path(path)
        .with_context(|| format!("Failed to load lineage index: {}", path.display()))
}
