//! Metrics collection and reporting for mpramap stages.
//!
//! One metric type per stage:
//! - [`score`] - Alignment scoring metrics
//! - [`group`] - Barcode grouping metrics
//! - [`resolve`] - Conflict resolution metrics
//! - [`writer`] - Metrics file I/O utilities
//!
//! # Traits
//!
//! - [`Metric`] - Core trait for serializable metrics
//! - [`ProcessingMetrics`] - Common interface for input/output metrics

pub mod group;
pub mod resolve;
pub mod score;
pub mod writer;

use serde::{Deserialize, Serialize};

pub use group::GroupingMetrics;
pub use resolve::ResolutionMetrics;
pub use score::ScoringMetrics;
pub use writer::{write_metrics, write_metrics_auto};

/// A metric type that can be serialized to TSV files.
///
/// All metric types implement this trait, providing a consistent interface for serialization
/// and identification.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name for this metric type.
    ///
    /// Used in error messages and logging when writing metrics files.
    fn metric_name() -> &'static str;
}

/// Common interface for metrics that track processing pipeline counts.
pub trait ProcessingMetrics {
    /// Total number of input items processed.
    fn total_input(&self) -> u64;

    /// Total number of output items produced.
    fn total_output(&self) -> u64;

    /// Total number of items filtered out or dropped.
    fn total_filtered(&self) -> u64;

    /// Processing efficiency as a percentage (output / input * 100).
    fn efficiency(&self) -> f64 {
        if self.total_input() == 0 {
            0.0
        } else {
            self.total_output() as f64 / self.total_input() as f64 * 100.0
        }
    }
}
