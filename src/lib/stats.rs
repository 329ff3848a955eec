//! Variant summary statistics for output files.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use fgconcord_vcf::{GenotypeCall, VcfReader};

use crate::metrics::VariantSummaryMetric;

/// Streams a VCF and summarizes its records and the genotypes of all its samples.
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains an invalid genotype.
pub fn summarize_vcf(path: &Path) -> Result<VariantSummaryMetric> {
    let reader = VcfReader::from_path(path)
        .with_context(|| format!("Failed to open {} for summary", path.display()))?;
    let mut summary = VariantSummaryMetric::default();

    for record in reader {
        let record = record?;
        let calls = (0..record.sample_count())
            .map(|i| record.genotype(i))
            .collect::<std::result::Result<Vec<GenotypeCall>, String>>()
            .map_err(|reason| {
                anyhow!("Invalid genotype at {}:{} in {}: {reason}", record.chrom(), record.pos(), path.display())
            })?;
        summary.add(&record, &calls);
    }
    Ok(summary)
}
