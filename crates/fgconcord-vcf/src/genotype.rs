//! Genotype calls resolved to allele strings.
//!
//! A VCF `GT` value such as `0/1` only has meaning relative to the REF and ALT columns of
//! its record. Genotypes here are stored as the allele strings themselves (`["A", "T"]`) so
//! that calls from different files can be compared after their records are merged.
//! Conversion to and from `noodles` genotype values happens at the record boundary.

use std::collections::BTreeSet;
use std::fmt;

use noodles::vcf::variant::record::samples::series::value::genotype::Phasing;
use noodles::vcf::variant::record_buf::samples::sample::value::Genotype as GenotypeBuf;
use noodles::vcf::variant::record_buf::samples::sample::value::genotype::Allele;

/// Allele identifier used for a no-call.
pub const NO_CALL: &str = ".";

/// An ordered sequence of allele identifiers called for one sample.
///
/// Equality follows allele-set semantics: `A/T`, `T/A` and `A|T` are all equal, and
/// phasing is ignored.
#[derive(Debug, Clone)]
pub struct Genotype {
    alleles: Vec<String>,
    phased: bool,
}

impl Genotype {
    /// Creates a genotype from allele strings.
    #[must_use]
    pub fn new(alleles: Vec<String>, phased: bool) -> Self {
        Self { alleles, phased }
    }

    /// Creates an unphased no-call genotype of the given ploidy (minimum one).
    #[must_use]
    pub fn no_call(ploidy: usize) -> Self {
        Self { alleles: vec![NO_CALL.to_string(); ploidy.max(1)], phased: false }
    }

    /// Resolves the allele positions of a `noodles` genotype against `alleles` (REF first,
    /// then ALTs).
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if a position is out of range.
    pub fn from_positions(gt: &GenotypeBuf, alleles: &[&str]) -> std::result::Result<Self, String> {
        let positions = gt.as_ref();
        if positions.is_empty() {
            return Ok(Self::no_call(1));
        }

        let phased = positions.iter().skip(1).any(|a| a.phasing() == Phasing::Phased);
        let mut resolved = Vec::with_capacity(positions.len());
        for allele in positions {
            match allele.position() {
                None => resolved.push(NO_CALL.to_string()),
                Some(i) => {
                    let called = alleles.get(i).ok_or_else(|| {
                        format!("allele index {i} exceeds {} alleles", alleles.len())
                    })?;
                    resolved.push((*called).to_string());
                }
            }
        }

        Ok(Self { alleles: resolved, phased })
    }

    /// The allele strings in call order.
    #[must_use]
    pub fn alleles(&self) -> &[String] {
        &self.alleles
    }

    #[must_use]
    pub fn is_phased(&self) -> bool {
        self.phased
    }

    #[must_use]
    pub fn ploidy(&self) -> usize {
        self.alleles.len()
    }

    /// True if at least one allele is called.
    #[must_use]
    pub fn is_called(&self) -> bool {
        self.alleles.iter().any(|a| a != NO_CALL)
    }

    /// The distinct allele identifiers of this genotype.
    #[must_use]
    pub fn allele_set(&self) -> BTreeSet<&str> {
        self.alleles.iter().map(String::as_str).collect()
    }

    /// Classifies the genotype relative to the record's reference allele.
    #[must_use]
    pub fn kind(&self, ref_allele: &str) -> GenotypeKind {
        if self.alleles.iter().any(|a| a == NO_CALL) {
            return GenotypeKind::NoCall;
        }
        let set = self.allele_set();
        if set.len() > 1 {
            GenotypeKind::Het
        } else if set.contains(ref_allele) {
            GenotypeKind::HomRef
        } else {
            GenotypeKind::HomVar
        }
    }

    /// Returns a copy with every called allele passed through `f`.
    #[must_use]
    pub fn map_alleles(&self, f: impl Fn(&str) -> String) -> Self {
        let alleles =
            self.alleles.iter().map(|a| if a == NO_CALL { a.clone() } else { f(a) }).collect();
        Self { alleles, phased: self.phased }
    }

    /// Encodes the genotype as a `noodles` `GT` value using positions in `alleles`.
    ///
    /// Returns `None` if a called allele is not present in `alleles`.
    #[must_use]
    pub fn encode(&self, alleles: &[String]) -> Option<GenotypeBuf> {
        let phasing = if self.phased { Phasing::Phased } else { Phasing::Unphased };
        self.alleles
            .iter()
            .map(|allele| {
                let position = if allele == NO_CALL {
                    None
                } else {
                    Some(alleles.iter().position(|a| a == allele)?)
                };
                Some(Allele::new(position, phasing))
            })
            .collect()
    }
}

impl PartialEq for Genotype {
    fn eq(&self, other: &Self) -> bool {
        self.allele_set() == other.allele_set()
    }
}

impl Eq for Genotype {}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.alleles.join(if self.phased { "|" } else { "/" }))
    }
}

/// The genotype one provenance contributes at a merged position.
///
/// `Absent` means the provenance had no record at the position at all, which is distinct
/// from a record that is present with a no-call genotype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenotypeCall {
    Absent,
    Present(Genotype),
}

impl GenotypeCall {
    /// The genotype, if present and called.
    #[must_use]
    pub fn called(&self) -> Option<&Genotype> {
        match self {
            Self::Present(gt) if gt.is_called() => Some(gt),
            _ => None,
        }
    }

    /// True if the provenance is absent or its genotype is a no-call.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.called().is_none()
    }

    #[must_use]
    pub fn kind(&self, ref_allele: &str) -> GenotypeKind {
        match self {
            Self::Absent => GenotypeKind::Unavailable,
            Self::Present(gt) => gt.kind(ref_allele),
        }
    }
}

/// Genotype categories used by concordance tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenotypeKind {
    HomRef,
    Het,
    HomVar,
    NoCall,
    Unavailable,
}

impl GenotypeKind {
    /// All kinds in table order.
    pub const ALL: [GenotypeKind; 5] =
        [Self::HomRef, Self::Het, Self::HomVar, Self::NoCall, Self::Unavailable];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HomRef => "HOM_REF",
            Self::Het => "HET",
            Self::HomVar => "HOM_VAR",
            Self::NoCall => "NO_CALL",
            Self::Unavailable => "UNAVAILABLE",
        }
    }

    /// True for genotypes carrying at least one non-reference allele.
    #[must_use]
    pub fn is_non_ref(self) -> bool {
        matches!(self, Self::Het | Self::HomVar)
    }

    /// True for genotypes that were called (including homozygous reference).
    #[must_use]
    pub fn is_called(self) -> bool {
        matches!(self, Self::HomRef | Self::Het | Self::HomVar)
    }
}

impl fmt::Display for GenotypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
