//! Utilities for writing and reading metrics files.

use anyhow::{Context, Result};
use fgoxide::io::DelimFile;
use serde::Serialize;
use std::path::Path;

use crate::Metric;

/// Write metrics to a TSV file with consistent error handling.
///
/// # Errors
/// Returns an error if the file cannot be created or written to
///
/// # Example
/// ```no_run
/// use fgconcord_metrics::writer::write_metrics;
/// use serde::Serialize;
/// use std::path::Path;
///
/// #[derive(Serialize)]
/// struct SiteCount {
///     contig: String,
///     count: usize,
/// }
///
/// let metrics = vec![SiteCount { contig: "chr1".to_string(), count: 10 }];
/// write_metrics(Path::new("counts.txt"), &metrics, "site count").unwrap();
/// ```
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

/// Write metrics implementing [`Metric`], using the metric's own name in error messages.
///
/// # Errors
/// Returns an error if the file cannot be created or written to
pub fn write_metrics_auto<P: AsRef<Path>, T: Metric>(path: P, metrics: &[T]) -> Result<()> {
    write_metrics(path, metrics, T::metric_name())
}

/// Read a TSV file previously written with [`write_metrics_auto`].
///
/// # Errors
/// Returns an error if the file cannot be read or a row does not deserialize
pub fn read_metrics<P: AsRef<Path>, T: Metric>(path: P) -> Result<Vec<T>> {
    let path_ref = path.as_ref();
    DelimFile::default()
        .read_tsv(&path_ref)
        .with_context(|| format!("Failed to read {} metrics: {}", T::metric_name(), path_ref.display()))
}
