//! Stage loops shared by the command-line tools.
//!
//! Each stage is a single-threaded streaming loop over an ordered input. The stage types keep
//! their own metrics, so the same loop body serves both the per-stage subcommands, which talk
//! to each other through TSV files, and `map`, which chains all three stages in memory.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::debug;

use crate::alignment_input::AlignmentSource;
use crate::grouper::{BarcodeGroup, BarcodeGrouper, GroupingFields};
use crate::ledger::AssignmentLedger;
use crate::metrics::{GroupingMetrics, ResolutionMetrics, ScoringMetrics};
use crate::progress::ProgressTracker;
use crate::record::AlignmentRecord;
use crate::resolver::{ConflictResolver, ResolvedAssignment};
use crate::summary::GroupSummary;

/// Writes one line followed by a newline.
fn write_line<W: Write + ?Sized>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Scores every alignment from `source`, handing each scored record to `sink` in input order.
///
/// # Errors
///
/// Returns an error if the source fails to read, an alignment fails to score, or `sink` fails.
pub fn score_alignments<F>(
    source: &mut dyn AlignmentSource,
    scorer: &crate::scorer::AlignmentScorer,
    mut sink: F,
) -> Result<ScoringMetrics>
where
    F: FnMut(AlignmentRecord) -> Result<()>,
{
    let mut metrics = ScoringMetrics::new();
    let mut progress = ProgressTracker::new("Scored alignments");

    for line in &mut *source {
        let line = line?;
        metrics.records_read += 1;
        let Some(record) = scorer
            .score(&line)
            .with_context(|| format!("Failed to score alignment {}", line.query_name))?
        else {
            metrics.strand_filtered += 1;
            continue;
        };
        metrics.observe(&record);
        progress.record(1);
        sink(record)?;
    }

    metrics.malformed_lines = source.malformed_lines();
    progress.log_final();
    Ok(metrics)
}

/// Scores every alignment from `source` and writes the scored lines to `writer`.
///
/// # Errors
///
/// See [`score_alignments`]; also fails if `writer` cannot be written.
pub fn run_score<W: Write + ?Sized>(
    source: &mut dyn AlignmentSource,
    scorer: &crate::scorer::AlignmentScorer,
    writer: &mut W,
) -> Result<ScoringMetrics> {
    score_alignments(source, scorer, |record| write_line(writer, &record.to_tsv_line()))
}

/// Iterator over the scored records of a TSV stream.
///
/// Lines without exactly the scored column count are dropped and counted; empty lines are
/// skipped. A malformed numeric column is an error.
pub struct ScoredRecords<R: BufRead> {
    lines: std::io::Lines<R>,
    malformed_lines: u64,
}

impl<R: BufRead> ScoredRecords<R> {
    /// Wraps a reader of scored lines.
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), malformed_lines: 0 }
    }

    /// Number of lines dropped for a wrong column count so far.
    #[must_use]
    pub fn malformed_lines(&self) -> u64 {
        self.malformed_lines
    }
}

impl<R: BufRead> Iterator for ScoredRecords<R> {
    type Item = Result<AlignmentRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if line.is_empty() {
                continue;
            }
            match AlignmentRecord::from_tsv_line(&line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {
                    debug!("Dropping malformed scored line: {line}");
                    self.malformed_lines += 1;
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// The grouping stage: a [`BarcodeGrouper`] plus its metrics.
#[derive(Debug)]
pub struct GroupStage {
    grouper: BarcodeGrouper,
    metrics: GroupingMetrics,
    progress: ProgressTracker,
}

impl GroupStage {
    /// Creates a grouping stage.
    #[must_use]
    pub fn new(fields: GroupingFields) -> Self {
        Self {
            grouper: BarcodeGrouper::new(fields),
            metrics: GroupingMetrics::new(),
            progress: ProgressTracker::new("Grouped records"),
        }
    }

    /// Folds one record, returning the group it completed, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is out of order.
    pub fn push(&mut self, record: &AlignmentRecord) -> Result<Option<BarcodeGroup>> {
        self.metrics.records_read += 1;
        self.progress.record(1);
        let group = self.grouper.push(record)?;
        if let Some(group) = &group {
            self.metrics.observe(group);
        }
        Ok(group)
    }

    /// Flushes the last group and returns it with the final metrics.
    pub fn finish(mut self) -> (Option<BarcodeGroup>, GroupingMetrics) {
        let group = self.grouper.finish();
        if let Some(group) = &group {
            self.metrics.observe(group);
        }
        self.progress.log_final();
        (group, self.metrics)
    }
}

/// Groups the scored lines of `reader` and writes one grouped line per barcode.
///
/// # Errors
///
/// Returns an error on a malformed numeric column, an ordering violation, or an I/O failure.
pub fn run_group<R: BufRead, W: Write + ?Sized>(
    reader: R,
    mut stage: GroupStage,
    writer: &mut W,
) -> Result<GroupingMetrics> {
    let mut records = ScoredRecords::new(reader);
    for record in &mut records {
        if let Some(group) = stage.push(&record?)? {
            write_line(writer, &group.to_tsv_line())?;
        }
    }

    let (last, mut metrics) = stage.finish();
    if let Some(group) = last {
        write_line(writer, &group.to_tsv_line())?;
    }
    metrics.malformed_lines = records.malformed_lines();
    Ok(metrics)
}

/// Where resolved barcodes are recorded for the assignment table.
#[derive(Debug)]
struct LedgerSink {
    ledger: AssignmentLedger,
    sample: String,
    max_error: f64,
}

/// The resolution stage: a [`ConflictResolver`], an optional assignment ledger, and metrics.
#[derive(Debug)]
pub struct ResolveStage {
    resolver: ConflictResolver,
    ledger: Option<LedgerSink>,
    metrics: ResolutionMetrics,
    progress: ProgressTracker,
}

impl ResolveStage {
    /// Creates a resolution stage without an assignment table.
    #[must_use]
    pub fn new(resolver: ConflictResolver) -> Self {
        Self {
            resolver,
            ledger: None,
            metrics: ResolutionMetrics::new(),
            progress: ProgressTracker::new("Resolved barcodes"),
        }
    }

    /// Records qualifying barcodes of `sample` in an assignment ledger.
    #[must_use]
    pub fn with_ledger(mut self, sample: impl Into<String>, max_error: f64) -> Self {
        self.ledger =
            Some(LedgerSink { ledger: AssignmentLedger::new(), sample: sample.into(), max_error });
        self
    }

    /// Resolves one barcode.
    ///
    /// # Errors
    ///
    /// Returns an error if the barcode conflicts with one already in the ledger.
    pub fn resolve(&mut self, group: BarcodeGroup) -> Result<ResolvedAssignment> {
        let resolved = self.resolver.resolve(group);
        self.metrics.observe(&resolved);
        if let Some(sink) = &mut self.ledger {
            if sink.ledger.record_resolved(&sink.sample, &resolved, sink.max_error)? {
                self.metrics.assigned += 1;
            }
        }
        self.progress.record(1);
        Ok(resolved)
    }

    /// Returns the ledger, if one was requested, and the final metrics.
    pub fn finish(self) -> (Option<AssignmentLedger>, ResolutionMetrics) {
        self.progress.log_final();
        (self.ledger.map(|sink| sink.ledger), self.metrics)
    }
}

/// Resolves the grouped lines of `reader`, writing one resolved line per barcode.
///
/// Every line must be a well-formed grouped line.
///
/// # Errors
///
/// Returns an error on any malformed line, a ledger conflict, or an I/O failure.
pub fn run_resolve<R: BufRead, W: Write + ?Sized>(
    reader: R,
    stage: &mut ResolveStage,
    writer: &mut W,
) -> Result<()> {
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let group = BarcodeGroup::from_tsv_line(&line)
            .with_context(|| format!("Invalid grouped line {}", number + 1))?;
        let resolved = stage.resolve(group)?;
        write_line(writer, &resolved.render_from(&line))?;
    }
    Ok(())
}

/// Metrics from the first two stages of [`run_map`].
#[derive(Debug, Clone, Default)]
pub struct MapMetrics {
    /// Scoring stage metrics.
    pub scoring: ScoringMetrics,
    /// Grouping stage metrics.
    pub grouping: GroupingMetrics,
}

/// Scores, groups and resolves `source` in one pass, writing resolved lines to `writer`.
///
/// The alignments must be sorted by the grouping key.
///
/// # Errors
///
/// Returns the first error of any stage.
pub fn run_map<W: Write + ?Sized>(
    source: &mut dyn AlignmentSource,
    scorer: &crate::scorer::AlignmentScorer,
    mut grouping: GroupStage,
    resolving: &mut ResolveStage,
    writer: &mut W,
) -> Result<MapMetrics> {
    let scoring = score_alignments(source, scorer, |record| {
        if let Some(group) = grouping.push(&record)? {
            write_line(writer, &resolving.resolve(group)?.to_tsv_line())?;
        }
        Ok(())
    })?;

    let (last, grouping) = grouping.finish();
    if let Some(group) = last {
        write_line(writer, &resolving.resolve(group)?.to_tsv_line())?;
    }
    Ok(MapMetrics { scoring, grouping })
}

/// Builds the oligo support and coverage histogram tables from grouped lines.
///
/// # Errors
///
/// Returns an error on any malformed line or a read failure.
pub fn run_summarize<R: BufRead>(reader: R) -> Result<GroupSummary> {
    let mut summary = GroupSummary::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let group = BarcodeGroup::from_tsv_line(&line)
            .with_context(|| format!("Invalid grouped line {}", number + 1))?;
        summary.add(&group);
    }
    Ok(summary)
}
