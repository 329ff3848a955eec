#![deny(unsafe_code)]

//! Structured metric types and TSV writer for fgconcord.
//!
//! This crate provides:
//! - [`Metric`] trait for metric rows written as TSV
//! - [`concordance`] genotype concordance tables and summaries
//! - [`summary`] per-file variant summaries
//! - [`writer`] module for TSV file output

pub mod concordance;
pub mod summary;
pub mod writer;

use serde::{Deserialize, Serialize};

/// Number of decimal places used for float metrics.
pub const FLOAT_PRECISION: usize = 6;

/// Formats a float value with the standard precision for metrics.
///
/// # Example
/// ```
/// use fgconcord_metrics::format_float;
/// assert_eq!(format_float(0.9), "0.900000");
/// assert_eq!(format_float(0.0), "0.000000");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    format!("{value:.FLOAT_PRECISION$}")
}

/// Formats a count with thousands separators.
///
/// # Example
/// ```
/// use fgconcord_metrics::format_count;
/// assert_eq!(format_count(1234567), "1,234,567");
/// assert_eq!(format_count(12), "12");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Ratio of two counts, zero when the denominator is zero.
#[must_use]
pub fn fraction(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        #[expect(clippy::cast_precision_loss, reason = "site counts never exceed 2^53")]
        let result = numerator as f64 / denominator as f64;
        result
    }
}

/// A metric type that can be serialized to TSV files.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name for this metric type, used in error messages and logging.
    fn metric_name() -> &'static str;
}

pub use concordance::{ConcordanceCounter, ConcordanceSummaryMetric, GenotypeConcordanceMetric};
pub use summary::VariantSummaryMetric;
pub use writer::{read_metrics, write_metrics};
