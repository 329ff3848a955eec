//! VCF header handling.

use noodles::vcf;

use crate::{Result, VcfError};

/// A parsed VCF header.
#[derive(Debug, Clone)]
pub struct VcfHeader {
    inner: vcf::Header,
}

impl From<vcf::Header> for VcfHeader {
    fn from(inner: vcf::Header) -> Self {
        Self { inner }
    }
}

impl VcfHeader {
    /// Parses a header block: `##` meta lines followed by the `#CHROM` line.
    ///
    /// # Errors
    ///
    /// Returns [`VcfError::InvalidHeader`] if `noodles` rejects the header.
    pub fn parse(text: &str, path: &str) -> Result<Self> {
        let inner: vcf::Header = text.parse().map_err(|e| VcfError::InvalidHeader {
            path: path.to_string(),
            reason: format!("{e}"),
        })?;
        Ok(Self { inner })
    }

    /// The underlying `noodles` header.
    #[must_use]
    pub fn inner(&self) -> &vcf::Header {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut vcf::Header {
        &mut self.inner
    }

    #[must_use]
    pub fn sample_names(&self) -> Vec<String> {
        self.inner.sample_names().iter().cloned().collect()
    }

    /// Declared contigs with their lengths, in header order.
    #[must_use]
    pub fn contigs(&self) -> Vec<(String, Option<usize>)> {
        self.inner.contigs().iter().map(|(name, contig)| (name.clone(), contig.length())).collect()
    }

    #[must_use]
    pub fn has_info(&self, id: &str) -> bool {
        self.inner.infos().contains_key(id)
    }

    #[must_use]
    pub fn has_format(&self, id: &str) -> bool {
        self.inner.formats().contains_key(id)
    }

    /// Resolves the column index for `sample`.
    ///
    /// A file with exactly one sample column is accepted regardless of its name, since
    /// callers frequently label their single sample differently from the experiment.
    ///
    /// # Errors
    ///
    /// Returns [`VcfError::SampleNotFound`] if the sample is absent from a multi-sample file
    /// or the file has no sample columns.
    pub fn sample_index(&self, sample: &str, path: &str) -> Result<usize> {
        let names = self.inner.sample_names();
        if let Some(index) = names.get_index_of(sample) {
            return Ok(index);
        }
        if names.len() == 1 {
            return Ok(0);
        }
        let available = names.iter().cloned().collect::<Vec<_>>().join(",");
        Err(VcfError::SampleNotFound {
            sample: sample.to_string(),
            path: path.to_string(),
            available: if available.is_empty() { "none".to_string() } else { available },
        })
    }

    /// Returns a copy of this header with the given sample columns.
    #[must_use]
    pub fn with_samples(&self, samples: &[String]) -> Self {
        let mut inner = self.inner.clone();
        *inner.sample_names_mut() = samples.iter().cloned().collect();
        Self { inner }
    }
}
