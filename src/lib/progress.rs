//! Progress logging for record streams.
//!
//! Comparison runs stream one file at a time on a single thread, so the tracker is a plain
//! counter owned by the loop that drives the stream.

use log::info;

use crate::metrics::format_count;

/// Default number of records between progress messages.
pub const DEFAULT_INTERVAL: u64 = 100_000;

/// Logs a message each time the number of processed records crosses an interval.
///
/// # Example
/// ```
/// use fgconcord_lib::progress::ProgressTracker;
///
/// let mut tracker = ProgressTracker::new("Merged records").with_interval(100);
/// for _ in 0..250 {
///     tracker.record(1); // logs at 100 and 200
/// }
/// tracker.log_final(); // logs "Merged records 250 (complete)"
/// assert_eq!(tracker.count(), 250);
/// ```
#[derive(Debug)]
pub struct ProgressTracker {
    interval: u64,
    message: String,
    count: u64,
}

impl ProgressTracker {
    /// Creates a tracker with a count of zero and the default interval.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: DEFAULT_INTERVAL, message: message.into(), count: 0 }
    }

    /// Sets the logging interval; zero is treated as one.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Adds `additional` records, logging once for every interval boundary crossed.
    ///
    /// Returns true if the new count lies exactly on a boundary.
    pub fn record(&mut self, additional: u64) -> bool {
        let prev = self.count;
        self.count += additional;
        for i in (prev / self.interval + 1)..=(self.count / self.interval) {
            info!("{} {}", self.message, format_count(i * self.interval));
        }
        self.on_boundary()
    }

    fn on_boundary(&self) -> bool {
        self.count > 0 && self.count.is_multiple_of(self.interval)
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Logs the final count unless the last [`record`](Self::record) call already did.
    pub fn log_final(&self) {
        if self.count > 0 && !self.on_boundary() {
            info!("{} {} (complete)", self.message, format_count(self.count));
        }
    }
}
