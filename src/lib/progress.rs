//! Progress tracking utilities
//!
//! Every pipeline stage runs on a single thread, so the tracker is a plain counter owned by
//! the stage loop. It logs whenever the count crosses an interval boundary.

use log::info;

/// Default number of records between progress lines.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;

/// Progress tracker for logging progress at regular intervals.
///
/// # Example
/// ```
/// use mpramap_lib::progress::ProgressTracker;
///
/// let mut tracker = ProgressTracker::new("Scored alignments").with_interval(100);
///
/// for _ in 0..250 {
///     tracker.record(1);  // Logs at 100, 200
/// }
/// tracker.log_final();  // Logs "Scored alignments 250 (complete)"
/// assert_eq!(tracker.count(), 250);
/// ```
#[derive(Debug)]
pub struct ProgressTracker {
    /// Progress is logged when count crosses multiples of this.
    interval: u64,
    /// Message prefix for log output.
    message: String,
    count: u64,
}

impl ProgressTracker {
    /// Create a new progress tracker with the specified message.
    ///
    /// The tracker starts with a count of 0 and an interval of [`DEFAULT_PROGRESS_INTERVAL`].
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: DEFAULT_PROGRESS_INTERVAL, message: message.into(), count: 0 }
    }

    /// Set the logging interval. Zero is treated as one.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Add to the count and log once per interval boundary crossed.
    ///
    /// Returns `true` if the new count is exactly a multiple of the interval.
    pub fn record(&mut self, additional: u64) -> bool {
        let prev = self.count;
        self.count += additional;

        for i in (prev / self.interval + 1)..=(self.count / self.interval) {
            info!("{} {}", self.message, i * self.interval);
        }

        self.count > 0 && self.count.is_multiple_of(self.interval)
    }

    /// Log the final count unless the last [`record`](Self::record) already landed on it.
    pub fn log_final(&self) {
        if self.count > 0 && !self.count.is_multiple_of(self.interval) {
            info!("{} {} (complete)", self.message, self.count);
        }
    }

    /// Get the current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}
