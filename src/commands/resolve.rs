//! Resolve multi-candidate barcodes by coverage ratio.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use mpramap_lib::io::{open_reader, open_writer};
use mpramap_lib::logging::{OperationTimer, log_resolution_summary};
use mpramap_lib::pipeline::{ResolveStage, run_resolve};

use crate::commands::command::Command;
use crate::commands::common::{MetricsOptions, ResolutionOptions, TsvIoOptions};

/// Decide a winning oligo per barcode or keep it ambiguous.
#[derive(Debug, Parser)]
#[command(
    name = "resolve",
    about = "\x1b[38;5;72m[STAGES]\x1b[0m         \x1b[36mResolve barcodes seen with several oligos\x1b[0m",
    long_about = r#"
Resolve barcodes that were seen with more than one candidate oligo.

Input is the output of `mpramap group`. Single-candidate barcodes pass through unchanged. For
a barcode with several candidates, every other candidate's coverage is divided by the highest
coverage; if any ratio exceeds --ambiguity-ratio (or ties the highest coverage) the barcode is
kept ambiguous and written unchanged, otherwise it is collapsed to the highest-coverage
candidate.

With --lineage-index (saturation mutagenesis designs), a competitor exceeding
--ambiguity-ratio keeps the barcode ambiguous when both best alignments are exact. Otherwise
a competitor that shares a parent lineage with the winner must exceed --same-lineage-ratio.

Every input line must be well formed; any malformed line aborts the run.

With --assignments, barcodes that are not ambiguous, whose best score is at most --max-error
and whose oligo is not `*` are written to an assignment table.

Example usage:
  mpramap resolve -i grouped.tsv -o resolved.tsv
  mpramap resolve -i grouped.tsv -o resolved.tsv -l attributes.tsv --saturation \
      -a assignments.tsv --assignment-columns full
"#
)]
pub struct Resolve {
    /// Input/output options
    #[command(flatten)]
    pub io: TsvIoOptions,

    /// Resolution options
    #[command(flatten)]
    pub resolution: ResolutionOptions,

    /// Metrics output
    #[command(flatten)]
    pub metrics: MetricsOptions,
}

impl Command for Resolve {
    fn execute(&self, command_line: &str) -> Result<()> {
        debug!("Command line: {command_line}");
        self.io.validate("Grouped barcodes")?;
        let resolver = self.resolution.build_resolver()?;

        info!("Input: {}", self.io.input.display());
        info!("Output: {}", self.io.output.display());
        info!("Saturation mode: {}", resolver.is_saturation());

        let mut stage = ResolveStage::new(resolver);
        if self.resolution.assignments.is_some() {
            stage = stage.with_ledger(self.resolution.sample.clone(), self.resolution.max_error);
        }

        let timer = OperationTimer::new("Resolving barcodes");
        let reader = open_reader(&self.io.input)?;
        let mut writer = open_writer(&self.io.output)?;

        run_resolve(reader, &mut stage, &mut writer)
            .with_context(|| format!("Failed to resolve {}", self.io.input.display()))?;
        writer.flush().with_context(|| {
            format!("Failed to flush output: {}", self.io.output.display())
        })?;

        let (ledger, metrics) = stage.finish();
        timer.log_completion(metrics.barcodes);
        log_resolution_summary(&metrics);
        self.resolution.write_assignments(ledger.as_ref())?;
        self.metrics.write(&metrics)
    }
}
