//! Genotype concordance metrics for a pair of call sets.
//!
//! Concordance is tabulated as a matrix of (eval genotype type, comp genotype type) counts,
//! one cell per row in the TSV, together with a one-row summary of the derived rates.

use fgconcord_vcf::GenotypeKind;
use serde::{Deserialize, Serialize};

use crate::{Metric, fraction};

/// One cell of the eval-by-comp genotype type matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenotypeConcordanceMetric {
    /// Sample the genotypes were taken from
    pub sample: String,
    /// Genotype type in the evaluated call set
    pub eval_genotype: String,
    /// Genotype type in the comparison call set
    pub comp_genotype: String,
    /// Number of sites with this combination
    pub count: u64,
}

impl Metric for GenotypeConcordanceMetric {
    fn metric_name() -> &'static str {
        "genotype concordance"
    }
}

/// Summary rates derived from the genotype type matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConcordanceSummaryMetric {
    pub sample: String,
    /// Provenance label of the evaluated call set
    pub eval: String,
    /// Provenance label of the comparison call set
    pub comp: String,
    /// Sites present in either call set
    pub sites: u64,
    /// Sites called in both call sets
    pub both_called: u64,
    /// Sites called in both with identical allele sets
    pub both_called_concordant: u64,
    /// `both_called_concordant / both_called`
    pub genotype_concordance: f64,
    /// Fraction of comp non-reference sites also called non-reference in eval
    pub non_ref_sensitivity: f64,
    /// Fraction of sites called in both, non-reference in either, with differing genotypes
    pub non_ref_discrepancy: f64,
}

impl Metric for ConcordanceSummaryMetric {
    fn metric_name() -> &'static str {
        "concordance summary"
    }
}

/// Accumulates genotype comparisons site by site.
#[derive(Debug, Clone, Default)]
pub struct ConcordanceCounter {
    matrix: [[u64; 5]; 5],
    both_called: u64,
    both_called_concordant: u64,
    non_ref_sites: u64,
    non_ref_discordant: u64,
}

fn index(kind: GenotypeKind) -> usize {
    match kind {
        GenotypeKind::HomRef => 0,
        GenotypeKind::Het => 1,
        GenotypeKind::HomVar => 2,
        GenotypeKind::NoCall => 3,
        GenotypeKind::Unavailable => 4,
    }
}

impl ConcordanceCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one site. `same_alleles` is whether both genotypes have the same allele set.
    pub fn add(&mut self, eval: GenotypeKind, comp: GenotypeKind, same_alleles: bool) {
        self.matrix[index(eval)][index(comp)] += 1;
        if eval.is_called() && comp.is_called() {
            self.both_called += 1;
            if same_alleles {
                self.both_called_concordant += 1;
            }
            if eval.is_non_ref() || comp.is_non_ref() {
                self.non_ref_sites += 1;
                if !same_alleles {
                    self.non_ref_discordant += 1;
                }
            }
        }
    }

    /// Count for one cell of the matrix.
    #[must_use]
    pub fn count(&self, eval: GenotypeKind, comp: GenotypeKind) -> u64 {
        self.matrix[index(eval)][index(comp)]
    }

    /// Total number of sites recorded.
    #[must_use]
    pub fn sites(&self) -> u64 {
        self.matrix.iter().flatten().sum()
    }

    /// The full matrix as metric rows, in [`GenotypeKind::ALL`] order.
    #[must_use]
    pub fn to_table(&self, sample: &str) -> Vec<GenotypeConcordanceMetric> {
        let mut rows = Vec::with_capacity(25);
        for eval in GenotypeKind::ALL {
            for comp in GenotypeKind::ALL {
                rows.push(GenotypeConcordanceMetric {
                    sample: sample.to_string(),
                    eval_genotype: eval.as_str().to_string(),
                    comp_genotype: comp.as_str().to_string(),
                    count: self.count(eval, comp),
                });
            }
        }
        rows
    }

    #[must_use]
    pub fn summarize(&self, sample: &str, eval: &str, comp: &str) -> ConcordanceSummaryMetric {
        let comp_non_ref: u64 = GenotypeKind::ALL
            .iter()
            .flat_map(|e| [GenotypeKind::Het, GenotypeKind::HomVar].map(|c| self.count(*e, c)))
            .sum();
        let both_non_ref: u64 = [GenotypeKind::Het, GenotypeKind::HomVar]
            .iter()
            .flat_map(|e| [GenotypeKind::Het, GenotypeKind::HomVar].map(|c| self.count(*e, c)))
            .sum();

        ConcordanceSummaryMetric {
            sample: sample.to_string(),
            eval: eval.to_string(),
            comp: comp.to_string(),
            sites: self.sites(),
            both_called: self.both_called,
            both_called_concordant: self.both_called_concordant,
            genotype_concordance: fraction(self.both_called_concordant, self.both_called),
            non_ref_sensitivity: fraction(both_non_ref, comp_non_ref),
            non_ref_discrepancy: fraction(self.non_ref_discordant, self.non_ref_sites),
        }
    }
}
