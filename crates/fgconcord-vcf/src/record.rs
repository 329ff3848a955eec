//! A single VCF data line.

use noodles::core::Position;
use noodles::vcf::variant::RecordBuf;
use noodles::vcf::variant::record_buf::info::field::Value as InfoValue;
use noodles::vcf::variant::record_buf::samples::sample::Value as SampleValue;
use noodles::vcf::variant::record_buf::samples::sample::value::Genotype as GenotypeBuf;
use noodles::vcf::variant::record_buf::{AlternateBases, Samples};

use crate::genotype::{Genotype, GenotypeCall};

/// Key of the FORMAT field holding the genotype.
pub const GT_KEY: &str = "GT";

/// A `noodles` record buffer with a known 1-based position.
///
/// Genotypes are read from the buffer's typed `GT` values and resolved to allele strings on
/// request; every other column is carried as parsed so subsets can be written back out.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    inner: RecordBuf,
    pos: usize,
}

impl VariantRecord {
    /// Wraps a record buffer read from a file.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the record has no position.
    pub fn from_buf(inner: RecordBuf) -> std::result::Result<Self, String> {
        let pos = inner
            .variant_start()
            .map(usize::from)
            .ok_or_else(|| "record has no 1-based position".to_string())?;
        Ok(Self { inner, pos })
    }

    /// Creates a sites-level record with missing ID, QUAL, FILTER and INFO and no samples.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if `pos` is zero.
    pub fn new(
        chrom: impl Into<String>,
        pos: usize,
        ref_allele: impl Into<String>,
    ) -> std::result::Result<Self, String> {
        let start = Position::new(pos).ok_or_else(|| "position must be 1-based".to_string())?;
        let inner = RecordBuf::builder()
            .set_reference_sequence_name(chrom.into())
            .set_variant_start(start)
            .set_reference_bases(ref_allele.into())
            .build();
        Ok(Self { inner, pos })
    }

    /// The underlying record buffer.
    #[must_use]
    pub fn as_buf(&self) -> &RecordBuf {
        &self.inner
    }

    pub fn as_buf_mut(&mut self) -> &mut RecordBuf {
        &mut self.inner
    }

    #[must_use]
    pub fn chrom(&self) -> &str {
        self.inner.reference_sequence_name()
    }

    /// 1-based position
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn ref_allele(&self) -> &str {
        self.inner.reference_bases()
    }

    #[must_use]
    pub fn alt_alleles(&self) -> &[String] {
        self.inner.alternate_bases().as_ref()
    }

    pub fn set_alt_alleles(&mut self, alts: Vec<String>) {
        *self.inner.alternate_bases_mut() = AlternateBases::from(alts);
    }

    /// REF followed by the ALT alleles.
    #[must_use]
    pub fn alleles(&self) -> Vec<&str> {
        std::iter::once(self.ref_allele()).chain(self.alt_alleles().iter().map(String::as_str)).collect()
    }

    /// Number of sample columns.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.inner.samples().values().count()
    }

    /// Extracts the genotype of the sample in column `sample_index`.
    ///
    /// A record without a `GT` key, or whose sample column stops before `GT`, yields a
    /// present no-call.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the column does not exist or the GT value
    /// cannot be resolved against the record's alleles.
    pub fn genotype(&self, sample_index: usize) -> std::result::Result<GenotypeCall, String> {
        let samples = self.inner.samples();
        if !samples.keys().as_ref().contains(GT_KEY) {
            return Ok(GenotypeCall::Present(Genotype::no_call(1)));
        }
        let sample = samples
            .get_index(sample_index)
            .ok_or_else(|| format!("record has no sample column {}", sample_index + 1))?;

        let positions = match sample.get(GT_KEY) {
            Some(Some(SampleValue::Genotype(gt))) => gt.clone(),
            Some(Some(SampleValue::String(text))) => {
                text.parse::<GenotypeBuf>().map_err(|e| format!("invalid GT '{text}': {e}"))?
            }
            Some(Some(other)) => return Err(format!("GT has a non-genotype value {other:?}")),
            Some(None) | None => return Ok(GenotypeCall::Present(Genotype::no_call(1))),
        };
        Genotype::from_positions(&positions, &self.alleles()).map(GenotypeCall::Present)
    }

    /// Replaces the sample columns with a single `GT` field per column.
    pub fn set_genotypes(&mut self, genotypes: Vec<GenotypeBuf>) {
        let keys = [GT_KEY.to_string()].into_iter().collect();
        let values = genotypes.into_iter().map(|gt| vec![Some(SampleValue::Genotype(gt))]).collect();
        *self.inner.samples_mut() = Samples::new(keys, values);
    }

    /// Looks up a string-valued INFO key.
    #[must_use]
    pub fn info_value(&self, key: &str) -> Option<&str> {
        match self.inner.info().get(key) {
            Some(Some(InfoValue::String(value))) => Some(value),
            _ => None,
        }
    }

    /// Sets a string-valued INFO key, replacing any existing value.
    pub fn set_info(&mut self, key: &str, value: &str) {
        self.inner.info_mut().insert(key.to_string(), Some(InfoValue::String(value.to_string())));
    }

    /// True if the record failed one or more filters.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        let filters = self.inner.filters();
        !filters.as_ref().is_empty() && !filters.is_pass()
    }

    /// Classifies the record by comparing each ALT allele to REF.
    #[must_use]
    pub fn variant_kind(&self) -> VariantKind {
        let ref_allele = self.ref_allele();
        let mut kinds = self
            .alt_alleles()
            .iter()
            .filter(|alt| *alt != "*")
            .map(|alt| VariantKind::of(ref_allele, alt));
        let Some(first) = kinds.next() else {
            return VariantKind::NoVariation;
        };
        if kinds.all(|k| k == first) { first } else { VariantKind::Mixed }
    }
}

/// Coarse variant types used in per-file summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    NoVariation,
    Snp,
    Mnp,
    Insertion,
    Deletion,
    /// Symbolic, complex, or a mixture of kinds across ALT alleles
    Mixed,
}

impl VariantKind {
    fn of(ref_allele: &str, alt: &str) -> Self {
        if alt.starts_with('<') || alt.contains('[') || alt.contains(']') {
            return Self::Mixed;
        }
        match (ref_allele.len(), alt.len()) {
            (1, 1) => Self::Snp,
            (r, a) if r == a => Self::Mnp,
            (r, a) if r < a && alt.starts_with(ref_allele) => Self::Insertion,
            (r, a) if r > a && ref_allele.starts_with(alt) => Self::Deletion,
            _ => Self::Mixed,
        }
    }
}
