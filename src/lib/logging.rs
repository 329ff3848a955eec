//! Formatting helpers and summary logging for comparison runs.

use std::time::{Duration, Instant};

use crate::metrics::{ConcordanceSummaryMetric, format_count};
use crate::split::SplitCounts;

/// Formats a fraction (0.0-1.0) as a percentage with `decimals` places.
///
/// # Examples
///
/// ```
/// use fgconcord_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(1.0, 0), "100%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0)
}

/// Formats a duration in human-readable form (e.g. "45s", "2m 15s", "1h 30m").
///
/// # Examples
///
/// ```
/// use fgconcord_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        0..60 => format!("{secs}s"),
        60..3600 => match (secs / 60, secs % 60) {
            (mins, 0) => format!("{mins}m"),
            (mins, rem) => format!("{mins}m {rem}s"),
        },
        _ => match (secs / 3600, (secs % 3600) / 60) {
            (hours, 0) => format!("{hours}h"),
            (hours, mins) => format!("{hours}h {mins}m"),
        },
    }
}

/// Formats a processing rate, falling back to a per-minute rate below one per second.
///
/// # Examples
///
/// ```
/// use fgconcord_lib::logging::format_rate;
/// use std::time::Duration;
///
/// assert_eq!(format_rate(1000, Duration::from_secs(1), "records"), "1,000 records/s");
/// assert_eq!(format_rate(30, Duration::from_secs(60), "records"), "30.0 records/min");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(count: u64, duration: Duration, unit: &str) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} {unit}/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} {unit}/s", format_count(rate as u64))
    } else {
        format!("{:.1} {unit}/min", count as f64 / (secs / 60.0))
    }
}

/// Logs how the records of one pair were distributed across the split outputs.
pub fn log_split_summary(first: &str, second: &str, counts: &SplitCounts) {
    log::info!("Split of {first} and {second}:");
    log::info!("  Concordant: {}", format_count(counts.concordant));
    log::info!("  Discordant in {first}: {}", format_count(counts.first_vs_second));
    log::info!("  Discordant in {second}: {}", format_count(counts.second_vs_first));
    if counts.uncalled > 0 {
        log::info!("  Called in neither (dropped): {}", format_count(counts.uncalled));
    }
}

/// Logs the headline concordance rates for one pair.
pub fn log_concordance_summary(summary: &ConcordanceSummaryMetric) {
    log::info!("Concordance of {} against {} for {}:", summary.eval, summary.comp, summary.sample);
    log::info!("  Sites: {}", format_count(summary.sites));
    log::info!("  Called in both: {}", format_count(summary.both_called));
    log::info!("  Genotype concordance: {}", format_percent(summary.genotype_concordance, 2));
    log::info!("  Non-ref sensitivity: {}", format_percent(summary.non_ref_sensitivity, 2));
    log::info!("  Non-ref discrepancy: {}", format_percent(summary.non_ref_discrepancy, 2));
}

/// Times one stage of a run and logs its start and completion.
///
/// # Examples
///
/// ```no_run
/// use fgconcord_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Merging call sets");
/// // ... do work ...
/// timer.log_completion(10_000);
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

    /// Logs the completion with record count and rate.
    pub fn log_completion(&self, count: u64) {
        let duration = self.start_time.elapsed();
        log::info!(
            "{} completed: {} records in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration, "records")
        );
    }

    /// Logs the completion with elapsed time only.
    pub fn log_elapsed(&self) {
        log::info!("{} completed in {}", self.operation, format_duration(self.start_time.elapsed()));
    }
}
