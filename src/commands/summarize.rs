//! Oligo support and coverage histogram from grouped barcodes.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use log::{debug, info};

use mpramap_lib::io::open_reader;
use mpramap_lib::logging::{OperationTimer, format_count};
use mpramap_lib::metrics::write_metrics;
use mpramap_lib::pipeline::run_summarize;
use mpramap_lib::validation::validate_file_exists;

use crate::commands::command::Command;

/// Summarize grouped barcodes per oligo and by coverage.
#[derive(Debug, Parser)]
#[command(
    name = "summarize",
    about = "\x1b[38;5;173m[REPORTS]\x1b[0m        \x1b[36mSummarize oligo support and barcode coverage\x1b[0m",
    long_about = r#"
Summarize the output of `mpramap group`.

--oligo-support writes, for every oligo, the number of passing single-candidate barcodes
assigned to it and their summed coverage:
  oligo, barcodes, coverage

--coverage-histogram writes how many barcodes have each total coverage, the histogram input
of library-complexity extrapolation tools:
  coverage, barcodes

At least one output must be given.

Example usage:
  mpramap summarize -i grouped.tsv --oligo-support support.tsv --coverage-histogram hist.tsv
"#
)]
pub struct Summarize {
    /// Grouped barcodes; `-` for stdin
    #[arg(short = 'i', long = "input", default_value = "-")]
    pub input: PathBuf,

    /// Output TSV of per-oligo barcode support
    #[arg(long = "oligo-support")]
    pub oligo_support: Option<PathBuf>,

    /// Output TSV of the barcode coverage histogram
    #[arg(long = "coverage-histogram")]
    pub coverage_histogram: Option<PathBuf>,
}

impl Command for Summarize {
    fn execute(&self, command_line: &str) -> Result<()> {
        debug!("Command line: {command_line}");
        if self.oligo_support.is_none() && self.coverage_histogram.is_none() {
            bail!("At least one of --oligo-support or --coverage-histogram is required");
        }
        validate_file_exists(&self.input, "Grouped barcodes")?;

        let timer = OperationTimer::new("Summarizing barcodes");
        let summary = run_summarize(open_reader(&self.input)?)?;
        timer.log_completion(summary.barcodes());

        if let Some(path) = &self.oligo_support {
            let rows = summary.oligo_support();
            write_metrics(path, &rows, "oligo support")?;
            info!(
                "Wrote support for {} oligos to {}",
                format_count(rows.len() as u64),
                path.display()
            );
        }
        if let Some(path) = &self.coverage_histogram {
            write_metrics(path, &summary.coverage_histogram(), "coverage histogram")?;
            info!("Wrote coverage histogram to {}", path.display());
        }
        Ok(())
    }
}
