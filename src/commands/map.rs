//! Score, group and resolve in one streaming pass.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use mpramap_lib::alignment_input::open_alignment_source;
use mpramap_lib::io::open_writer;
use mpramap_lib::logging::{
    OperationTimer, log_grouping_summary, log_resolution_summary, log_scoring_summary,
};
use mpramap_lib::pipeline::{GroupStage, ResolveStage, run_map};
use mpramap_lib::scorer::AlignmentScorer;

use crate::commands::command::Command;
use crate::commands::common::{
    GroupingOptions, MetricsOptions, ResolutionOptions, ScoringOptions, TsvIoOptions,
};

/// Run all three stages on barcode-sorted alignments.
#[derive(Debug, Parser)]
#[command(
    name = "map",
    about = "\x1b[38;5;166m[PIPELINE]\x1b[0m       \x1b[36mScore, group and resolve sorted alignments\x1b[0m",
    long_about = r#"
Score, group and resolve barcode-sorted alignments in one process.

Equivalent to `mpramap score | mpramap group | mpramap resolve` on input already sorted by
barcode (for example a SAM file sorted by query name), without intermediate files. The
output is the resolved per-barcode lines; see the help of the individual stages for the
formats and options.

Metrics of all three stages are written to one file each when --score-metrics,
--group-metrics and --metrics are given.

Example usage:
  mpramap map -i aligned.sorted.sam -o resolved.tsv -a assignments.tsv
  mpramap map -i aligned.sorted.bam -o resolved.tsv -l attributes.tsv --saturation
"#
)]
pub struct Map {
    /// Input/output options
    #[command(flatten)]
    pub io: TsvIoOptions,

    /// Scoring options
    #[command(flatten)]
    pub scoring: ScoringOptions,

    /// Grouping options
    #[command(flatten)]
    pub grouping: GroupingOptions,

    /// Resolution options
    #[command(flatten)]
    pub resolution: ResolutionOptions,

    /// Optional output TSV for the scoring metrics
    #[arg(long = "score-metrics")]
    pub score_metrics: Option<PathBuf>,

    /// Optional output TSV for the grouping metrics
    #[arg(long = "group-metrics")]
    pub group_metrics: Option<PathBuf>,

    /// Resolution metrics output
    #[command(flatten)]
    pub metrics: MetricsOptions,
}

impl Command for Map {
    fn execute(&self, command_line: &str) -> Result<()> {
        debug!("Command line: {command_line}");
        self.io.validate("Input alignments")?;
        let config = self.scoring.to_config()?;
        let resolver = self.resolution.build_resolver()?;

        info!("Input: {}", self.io.input.display());
        info!("Output: {}", self.io.output.display());
        info!("Cutoff: {}", config.cutoff);
        info!("Saturation mode: {}", resolver.is_saturation());

        let mut resolving = ResolveStage::new(resolver);
        if self.resolution.assignments.is_some() {
            resolving =
                resolving.with_ledger(self.resolution.sample.clone(), self.resolution.max_error);
        }

        let timer = OperationTimer::new("Mapping barcodes");
        let mut source = open_alignment_source(&self.io.input)?;
        let scorer = AlignmentScorer::new(config, source.references().clone());
        let mut writer = open_writer(&self.io.output)?;

        let stage_metrics = run_map(
            source.as_mut(),
            &scorer,
            GroupStage::new(self.grouping.to_fields()),
            &mut resolving,
            &mut writer,
        )
        .with_context(|| format!("Failed to map {}", self.io.input.display()))?;
        writer.flush().with_context(|| {
            format!("Failed to flush output: {}", self.io.output.display())
        })?;

        let (ledger, metrics) = resolving.finish();
        timer.log_completion(stage_metrics.scoring.records_scored);
        log_scoring_summary(&stage_metrics.scoring);
        log_grouping_summary(&stage_metrics.grouping);
        log_resolution_summary(&metrics);

        self.resolution.write_assignments(ledger.as_ref())?;
        MetricsOptions { metrics: self.score_metrics.clone() }.write(&stage_metrics.scoring)?;
        MetricsOptions { metrics: self.group_metrics.clone() }.write(&stage_metrics.grouping)?;
        self.metrics.write(&metrics)
    }
}
