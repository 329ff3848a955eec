//! Genotype concordance classification of merged records.

use std::collections::BTreeSet;
use std::fmt;

use fgconcord_vcf::GenotypeCall;

/// Whether the call sets contributing to a merged record agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Concordant,
    Discordant,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concordant => f.write_str("concordant"),
            Self::Discordant => f.write_str("discordant"),
        }
    }
}

/// Classifies the genotype calls of one merged record, one call per provenance.
///
/// The record is concordant when every provenance has a called genotype and all of them
/// share one allele set. A provenance that is absent or carries a no-call is a distinct
/// value of its own, so missing data never makes a record concordant.
///
/// # Example
/// ```
/// use fgconcord_lib::classify::{Classification, classify};
/// use fgconcord_vcf::{Genotype, GenotypeCall};
///
/// let het = |a: &str, b: &str| GenotypeCall::Present(Genotype::new(vec![a.into(), b.into()], false));
/// assert_eq!(classify(&[het("A", "T"), het("T", "A")]), Classification::Concordant);
/// assert_eq!(classify(&[het("A", "T"), het("A", "G")]), Classification::Discordant);
/// assert_eq!(classify(&[het("A", "T"), GenotypeCall::Absent]), Classification::Discordant);
/// ```
#[must_use]
pub fn classify(calls: &[GenotypeCall]) -> Classification {
    let mut distinct: BTreeSet<BTreeSet<&str>> = BTreeSet::new();
    for call in calls {
        match call.called() {
            Some(genotype) => {
                distinct.insert(genotype.allele_set());
            }
            None => return Classification::Discordant,
        }
    }
    if distinct.len() == 1 { Classification::Concordant } else { Classification::Discordant }
}
