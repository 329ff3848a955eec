//! Per-file variant summary statistics.

use fgconcord_vcf::{GenotypeCall, GenotypeKind, VariantKind, VariantRecord};
use serde::{Deserialize, Serialize};

use crate::{Metric, format_count, format_float, fraction};

/// Counts describing the records in one VCF file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantSummaryMetric {
    /// Total records
    pub records: u64,
    pub snps: u64,
    pub mnps: u64,
    pub insertions: u64,
    pub deletions: u64,
    /// Symbolic, complex or mixed-type records
    pub mixed: u64,
    /// Records with no ALT allele
    pub no_variation: u64,
    /// Records failing one or more filters
    pub filtered: u64,
    /// Heterozygous genotypes, across all samples
    pub het: u64,
    /// Homozygous-variant genotypes, across all samples
    pub hom_var: u64,
    /// Homozygous-reference genotypes, across all samples
    pub hom_ref: u64,
    /// No-call genotypes, across all samples
    pub no_call: u64,
    /// Biallelic SNPs that are transitions
    pub transitions: u64,
    /// Biallelic SNPs that are transversions
    pub transversions: u64,
    /// `transitions / transversions`
    pub ti_tv_ratio: f64,
}

impl Metric for VariantSummaryMetric {
    fn metric_name() -> &'static str {
        "variant summary"
    }
}

fn is_transition(ref_base: &str, alt_base: &str) -> bool {
    matches!(
        (ref_base.to_ascii_uppercase().as_str(), alt_base.to_ascii_uppercase().as_str()),
        ("A", "G") | ("G", "A") | ("C", "T") | ("T", "C")
    )
}

impl VariantSummaryMetric {
    /// Adds one record and the genotype calls of its samples.
    pub fn add(&mut self, record: &VariantRecord, genotypes: &[GenotypeCall]) {
        self.records += 1;
        if record.is_filtered() {
            self.filtered += 1;
        }

        match record.variant_kind() {
            VariantKind::Snp => {
                self.snps += 1;
                if let [alt] = record.alt_alleles() {
                    if is_transition(record.ref_allele(), alt) {
                        self.transitions += 1;
                    } else {
                        self.transversions += 1;
                    }
                }
            }
            VariantKind::Mnp => self.mnps += 1,
            VariantKind::Insertion => self.insertions += 1,
            VariantKind::Deletion => self.deletions += 1,
            VariantKind::Mixed => self.mixed += 1,
            VariantKind::NoVariation => self.no_variation += 1,
        }

        for call in genotypes {
            match call.kind(record.ref_allele()) {
                GenotypeKind::Het => self.het += 1,
                GenotypeKind::HomVar => self.hom_var += 1,
                GenotypeKind::HomRef => self.hom_ref += 1,
                GenotypeKind::NoCall => self.no_call += 1,
                GenotypeKind::Unavailable => {}
            }
        }

        self.ti_tv_ratio = fraction(self.transitions, self.transversions);
    }

    /// Name/value pairs for display.
    #[must_use]
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Records", format_count(self.records)),
            ("SNPs", format_count(self.snps)),
            ("MNPs", format_count(self.mnps)),
            ("Insertions", format_count(self.insertions)),
            ("Deletions", format_count(self.deletions)),
            ("Mixed/other", format_count(self.mixed)),
            ("No variation", format_count(self.no_variation)),
            ("Filtered", format_count(self.filtered)),
            ("Heterozygous", format_count(self.het)),
            ("Homozygous variant", format_count(self.hom_var)),
            ("Homozygous reference", format_count(self.hom_ref)),
            ("No-call", format_count(self.no_call)),
            ("Ti/Tv", format_float(self.ti_tv_ratio)),
        ]
    }
}
