//! Logging utilities for formatted output.
//!
//! Count, percentage, duration and rate formatting, plus one summary logger per stage.

use std::time::{Duration, Instant};

use crate::metrics::{GroupingMetrics, ProcessingMetrics, ResolutionMetrics, ScoringMetrics};

/// Formats a count with thousands separators.
///
/// # Examples
///
/// ```
/// use mpramap_lib::logging::format_count;
///
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk))
        .collect::<Vec<_>>()
        .join(",")
}

/// Formats a percentage with specified decimal places.
///
/// # Arguments
///
/// * `value` - The fraction (0.0-1.0) to format as percentage
/// * `decimals` - Number of decimal places to include
///
/// # Returns
///
/// A string formatted as "XX.XX%" (e.g., "95.43%")
///
/// # Examples
///
/// ```
/// use mpramap_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(0.5, 1), "50.0%");
/// assert_eq!(format_percent(1.0, 0), "100%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0, decimals = decimals)
}

/// Formats a duration in human-readable form.
///
/// # Arguments
///
/// * `duration` - The duration to format
///
/// # Returns
///
/// A human-readable string (e.g., "2m 15s", "1h 30m", "45s")
///
/// # Examples
///
/// ```
/// use mpramap_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Formats a rate (items per second) with appropriate units.
///
/// # Arguments
///
/// * `count` - Number of items processed
/// * `duration` - Time taken to process items
///
/// # Returns
///
/// A formatted rate string (e.g., "1,234 items/s", "50.0 items/min")
///
/// # Examples
///
/// ```
/// use mpramap_lib::logging::format_rate;
/// use std::time::Duration;
///
/// assert_eq!(format_rate(1000, Duration::from_secs(1)), "1,000 items/s");
/// assert_eq!(format_rate(600, Duration::from_secs(60)), "10 items/s");
/// ```
#[must_use]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} items/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} items/s", format_count(rate as u64))
    } else {
        let items_per_min = count as f64 / (secs / 60.0);
        format!("{items_per_min:.1} items/min")
    }
}

/// Logs a formatted summary of the scoring stage.
///
/// # Examples
///
/// ```no_run
/// use mpramap_lib::logging::log_scoring_summary;
/// use mpramap_lib::metrics::ScoringMetrics;
///
/// let metrics = ScoringMetrics { records_read: 10_000, records_scored: 9_000, pass: 7_500,
///     fail: 1_500, ..ScoringMetrics::default() };
///
/// log_scoring_summary(&metrics);
/// ```
pub fn log_scoring_summary(metrics: &ScoringMetrics) {
    log::info!("Alignment Scoring Summary:");
    log::info!("  Records read: {}", format_count(metrics.records_read));
    log::info!("  Records scored: {}", format_count(metrics.records_scored));

    if metrics.records_scored > 0 {
        let pass_rate = metrics.pass as f64 / metrics.records_scored as f64;
        log::info!("  Passing: {} ({})", format_count(metrics.pass), format_percent(pass_rate, 2));
        log::info!("  Scored: {:.2}% of input", metrics.efficiency());
    }

    if metrics.strand_filtered > 0 {
        log::info!(
            "Filtered out {} reverse-strand records.",
            format_count(metrics.strand_filtered)
        );
    }
    if metrics.malformed_lines > 0 {
        log::warn!("Dropped {} malformed alignment lines.", format_count(metrics.malformed_lines));
    }
    if metrics.undefined_scores > 0 {
        log::warn!(
            "{} records aligned to references of unknown length.",
            format_count(metrics.undefined_scores)
        );
    }
}

/// Logs a formatted summary of the grouping stage.
pub fn log_grouping_summary(metrics: &GroupingMetrics) {
    log::info!("Barcode Grouping Summary:");
    log::info!("  Records read: {}", format_count(metrics.records_read));
    log::info!("  Barcodes: {}", format_count(metrics.barcodes));

    if metrics.barcodes > 0 {
        let collision_rate = metrics.collisions as f64 / metrics.barcodes as f64;
        log::info!(
            "  Collisions: {} ({})",
            format_count(metrics.collisions),
            format_percent(collision_rate, 2)
        );
        log::info!("  Passing single-candidate: {}", format_count(metrics.passing));
        log::info!("  Failing single-candidate: {}", format_count(metrics.failing));
    }

    if metrics.total_filtered() > 0 {
        log::warn!("Dropped {} malformed scored lines.", format_count(metrics.total_filtered()));
    }
}

/// Logs a formatted summary of the resolution stage.
pub fn log_resolution_summary(metrics: &ResolutionMetrics) {
    log::info!("Conflict Resolution Summary:");
    log::info!("  Barcodes: {}", format_count(metrics.barcodes));
    log::info!("  Single candidate: {}", format_count(metrics.single));
    log::info!("  Collapsed to a winner: {}", format_count(metrics.collapsed));
    log::info!("  Kept ambiguous: {}", format_count(metrics.ambiguous));
    if metrics.total_input() > 0 {
        log::info!("  Resolved: {:.2}%", metrics.efficiency());
    }

    if metrics.lineage_collapsed > 0 {
        log::info!(
            "  Collapsed within a lineage: {}",
            format_count(metrics.lineage_collapsed)
        );
    }
    if metrics.assigned > 0 {
        log::info!("  Assigned: {}", format_count(metrics.assigned));
    }
}

/// Operation timing and summary helper.
///
/// Tracks operation timing and provides formatted summary output.
///
/// # Examples
///
/// ```no_run
/// use mpramap_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Processing reads");
///
/// // ... do work ...
///
/// timer.log_completion(10_000); // Log with item count
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Logs the completion with item count and rate.
    pub fn log_completion(&self, count: u64) {
        let duration = self.start_time.elapsed();
        log::info!(
            "{} completed: {} in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration)
        );
    }
}
