//! Metrics produced by a comparison run.
//!
//! - [`concordance`] - Genotype concordance matrix and summary rates for a pair of call sets
//! - [`summary`] - Per-file variant summary statistics
//! - [`writer`] - Metrics file I/O utilities

// Re-export core items from fgconcord-metrics
pub use fgconcord_metrics::{FLOAT_PRECISION, Metric, format_count, format_float, fraction};

pub use fgconcord_metrics::concordance;
pub use fgconcord_metrics::summary;
pub use fgconcord_metrics::writer;

pub use concordance::{ConcordanceCounter, ConcordanceSummaryMetric, GenotypeConcordanceMetric};
pub use summary::VariantSummaryMetric;
pub use writer::{read_metrics, write_metrics};
