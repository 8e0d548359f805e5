//! Metrics file I/O.
//!
//! Every stage writes its metrics as a TSV with a header row, through
//! [`fgoxide::io::DelimFile`], so the files can be read back with the same serde types.

use anyhow::{Context, Result};
use fgoxide::io::DelimFile;
use serde::Serialize;
use std::path::Path;

use super::Metric;

/// Write metrics rows to a TSV file.
///
/// # Arguments
/// * `path` - Path to the output TSV file
/// * `metrics` - The rows to write
/// * `description` - Human-readable description of the metrics for error messages
///
/// # Errors
/// Returns an error if the file cannot be created or written to
pub fn write_metrics<P: AsRef<Path>, T: Serialize>(
    path: P,
    metrics: &[T],
    description: &str,
) -> Result<()> {
    let path_ref = path.as_ref();
    DelimFile::default()
        .write_tsv(&path_ref, metrics)
        .with_context(|| format!("Failed to write {} metrics: {}", description, path_ref.display()))
}

/// Write a single metrics row, named by its [`Metric`] implementation.
///
/// # Errors
/// Returns an error if the file cannot be created or written to
///
/// # Example
/// ```no_run
/// use mpramap_lib::metrics::ScoringMetrics;
/// use mpramap_lib::metrics::writer::write_metrics_auto;
/// use std::path::Path;
///
/// let metrics = ScoringMetrics { records_read: 10, ..ScoringMetrics::default() };
/// write_metrics_auto(Path::new("score_metrics.txt"), &metrics).unwrap();
/// ```
pub fn write_metrics_auto<P: AsRef<Path>, T: Metric>(path: P, metric: &T) -> Result<()> {
    write_metrics(path, std::slice::from_ref(metric), T::metric_name())
}

/// Read a metrics file written by [`write_metrics_auto`].
///
/// # Errors
/// Returns an error if the file cannot be read or parsed
pub fn read_metrics<P: AsRef<Path>, T: Metric>(path: P) -> Result<Vec<T>> {
    let path_ref = path.as_ref();
    DelimFile::default().read_tsv(&path_ref).with_context(|| {
        format!("Failed to read {} metrics: {}", T::metric_name(), path_ref.display())
    })
}
