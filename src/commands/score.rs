//! Score alignments of barcode-linked reads against the oligo designs.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use mpramap_lib::alignment_input::open_alignment_source;
use mpramap_lib::io::open_writer;
use mpramap_lib::logging::{OperationTimer, log_scoring_summary};
use mpramap_lib::pipeline::run_score;
use mpramap_lib::scorer::AlignmentScorer;

use crate::commands::command::Command;
use crate::commands::common::{MetricsOptions, ScoringOptions, TsvIoOptions};

/// Score each alignment by its normalized mismatch rate.
#[derive(Debug, Parser)]
#[command(
    name = "score",
    about = "\x1b[38;5;72m[STAGES]\x1b[0m         \x1b[36mScore SAM/BAM alignments against oligo designs\x1b[0m",
    long_about = r#"
Score alignments of barcode-linked reads against the designed oligo sequences.

Input is SAM text (plain or gzipped, `-` for stdin) or BAM (by `.bam` extension). Query names
carry the barcode and the expected oligo separated by `#`. Reference lengths come from the
`@SQ` header lines; alignments to references without a length get an undefined score (`-`)
and FAIL.

For each alignment, score_all counts clipped, inserted and deleted bases, substitutions and
reference bases not covered by the alignment, divided by the reference length. An alignment
PASSes when its three-decimal score_all is at most the cutoff.

Output has one 14-column tab-separated line per alignment, in input order:
  barcode, oligo, forward(1/0), tagged reference, reference, mapq, reference length, CIGAR,
  score_all, sequence, PASS/FAIL, score, cs, start:length

Lines with fewer than 11 columns are skipped and counted.

Example usage:
  mpramap score -i aligned.sam.gz -o scored.tsv.gz
  mpramap score -i aligned.bam -o scored.tsv --scoring-mode cigar --metrics score_metrics.txt
"#
)]
pub struct Score {
    /// Input/output options
    #[command(flatten)]
    pub io: TsvIoOptions,

    /// Scoring options
    #[command(flatten)]
    pub scoring: ScoringOptions,

    /// Metrics output
    #[command(flatten)]
    pub metrics: MetricsOptions,
}

impl Command for Score {
    fn execute(&self, command_line: &str) -> Result<()> {
        debug!("Command line: {command_line}");
        self.io.validate("Input alignments")?;
        let config = self.scoring.to_config()?;

        info!("Input: {}", self.io.input.display());
        info!("Output: {}", self.io.output.display());
        info!("Cutoff: {}", config.cutoff);
        info!("Scoring mode: {:?}", config.mode);

        let timer = OperationTimer::new("Scoring alignments");
        let mut source = open_alignment_source(&self.io.input)?;
        let scorer = AlignmentScorer::new(config, source.references().clone());
        let mut writer = open_writer(&self.io.output)?;

        let metrics = run_score(source.as_mut(), &scorer, &mut writer)?;
        writer.flush().with_context(|| {
            format!("Failed to flush output: {}", self.io.output.display())
        })?;

        timer.log_completion(metrics.records_scored);
        log_scoring_summary(&metrics);
        self.metrics.write(&metrics)
    }
}
