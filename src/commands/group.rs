//! Group sorted scored alignments by barcode.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use mpramap_lib::io::{open_reader, open_writer};
use mpramap_lib::logging::{OperationTimer, log_grouping_summary};
use mpramap_lib::pipeline::{GroupStage, run_group};

use crate::commands::command::Command;
use crate::commands::common::{GroupingOptions, MetricsOptions, TsvIoOptions};

/// Collapse the scored alignments of each barcode into one line.
#[derive(Debug, Parser)]
#[command(
    name = "group",
    about = "\x1b[38;5;72m[STAGES]\x1b[0m         \x1b[36mGroup sorted scored alignments by barcode\x1b[0m",
    long_about = r#"
Collapse the scored alignments of each barcode into one line.

Input is the output of `mpramap score`, sorted by barcode (for example with
`sort -t$'\t' -k1,1`). A barcode that sorts before the previous one aborts the run. Lines
without exactly 14 columns are dropped and counted.

For each barcode the output lists its distinct candidates in first-seen order, with their
coverage and the best (lowest score_all) alignment of each:
  barcode, candidates, coverages, total, flag, statuses, scores, CIGARs, cs, positions

The flag is 1 when more than one candidate was seen, otherwise 0 if any alignment PASSed and
2 if none did. Per-candidate statuses are 0 for PASS and 2 for FAIL.

Example usage:
  sort -t$'\t' -k1,1 scored.tsv | mpramap group -o grouped.tsv
  mpramap group -i scored.sorted.tsv.gz -o grouped.tsv --candidate-field reference
"#
)]
pub struct Group {
    /// Input/output options
    #[command(flatten)]
    pub io: TsvIoOptions,

    /// Grouping options
    #[command(flatten)]
    pub grouping: GroupingOptions,

    /// Metrics output
    #[command(flatten)]
    pub metrics: MetricsOptions,
}

impl Command for Group {
    fn execute(&self, command_line: &str) -> Result<()> {
        debug!("Command line: {command_line}");
        self.io.validate("Scored alignments")?;

        info!("Input: {}", self.io.input.display());
        info!("Output: {}", self.io.output.display());
        info!("Grouping by {:?}, candidates by {:?}", self.grouping.key, self.grouping.candidate);

        let timer = OperationTimer::new("Grouping barcodes");
        let reader = open_reader(&self.io.input)?;
        let mut writer = open_writer(&self.io.output)?;

        let metrics = run_group(reader, GroupStage::new(self.grouping.to_fields()), &mut writer)
            .with_context(|| format!("Failed to group {}", self.io.input.display()))?;
        writer.flush().with_context(|| {
            format!("Failed to flush output: {}", self.io.output.display())
        })?;

        timer.log_completion(metrics.records_read);
        log_grouping_summary(&metrics);
        self.metrics.write(&metrics)
    }
}
