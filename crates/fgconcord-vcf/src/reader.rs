//! Lazy, single-pass VCF reading.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use noodles::vcf;
use noodles::vcf::variant::RecordBuf;

use crate::header::VcfHeader;
use crate::record::VariantRecord;
use crate::{Result, VcfError};

/// Returns true if the path names a BGZF-compressed VCF.
#[must_use]
pub fn is_bgzf_path(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "gz" || e == "bgz")
}

/// Streams [`VariantRecord`]s from a VCF file.
///
/// The header is read eagerly on open; records are decoded by `noodles` one at a time as the
/// reader is iterated. Iteration consumes the reader, so re-reading requires re-opening the
/// file.
pub struct VcfReader {
    path: PathBuf,
    header: VcfHeader,
    inner: vcf::io::Reader<Box<dyn BufRead>>,
    buf: RecordBuf,
    records_read: usize,
}

impl VcfReader {
    /// Opens a plain or BGZF-compressed VCF and reads its header.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its header is invalid.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let inner = vcf::io::reader::Builder::default().build_from_path(path)?;
        Self::with_reader(inner, path)
    }

    /// Wraps an already-open stream positioned at the start of the header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be read or parsed.
    pub fn new<P: AsRef<Path>>(inner: Box<dyn BufRead>, path: P) -> Result<Self> {
        Self::with_reader(vcf::io::Reader::new(inner), path.as_ref())
    }

    fn with_reader(mut inner: vcf::io::Reader<Box<dyn BufRead>>, path: &Path) -> Result<Self> {
        let header = inner.read_header().map_err(|e| VcfError::InvalidHeader {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            header: VcfHeader::from(header),
            inner,
            buf: RecordBuf::default(),
            records_read: 0,
        })
    }

    #[must_use]
    pub fn header(&self) -> &VcfHeader {
        &self.header
    }

    fn malformed(&self, reason: impl Into<String>) -> VcfError {
        VcfError::MalformedRecord {
            path: self.path.display().to_string(),
            record: self.records_read,
            reason: reason.into(),
        }
    }

    fn read_record(&mut self) -> Result<Option<VariantRecord>> {
        let read = self.inner.read_record_buf(self.header.inner(), &mut self.buf);
        self.records_read += 1;
        match read {
            Ok(0) => Ok(None),
            Ok(_) => VariantRecord::from_buf(std::mem::take(&mut self.buf))
                .map(Some)
                .map_err(|reason| self.malformed(reason)),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => Err(self.malformed(e.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

impl Iterator for VcfReader {
    type Item = Result<VariantRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}
