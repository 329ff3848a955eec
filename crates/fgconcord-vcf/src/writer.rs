//! VCF writing that publishes output only once it is complete.
//!
//! Output is written to a temporary file next to the destination and renamed into place by
//! [`VcfWriter::finish`]. Callers that treat an existing output as already computed can
//! therefore never pick up a partially written file from an aborted run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use noodles::bgzf;
use noodles::vcf;
use noodles::vcf::variant::io::Write as _;
use tempfile::NamedTempFile;

use crate::Result;
use crate::header::VcfHeader;
use crate::reader::is_bgzf_path;
use crate::record::VariantRecord;

enum Sink {
    Plain(vcf::io::Writer<BufWriter<File>>),
    Bgzf(vcf::io::Writer<bgzf::Writer<File>>),
}

/// Writes a header and records to a VCF file, plain or BGZF by extension.
pub struct VcfWriter {
    path: PathBuf,
    temp: NamedTempFile,
    header: VcfHeader,
    sink: Sink,
    records_written: u64,
}

impl VcfWriter {
    /// Creates the writer and writes `header`.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created or the header written.
    pub fn create<P: AsRef<Path>>(path: P, header: &VcfHeader) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let temp = tempfile::Builder::new().prefix(".fgconcord-").suffix(".tmp").tempfile_in(&dir)?;
        let file = temp.as_file().try_clone()?;
        let mut sink = if is_bgzf_path(&path) {
            Sink::Bgzf(vcf::io::Writer::new(bgzf::Writer::new(file)))
        } else {
            Sink::Plain(vcf::io::Writer::new(BufWriter::new(file)))
        };

        match &mut sink {
            Sink::Plain(w) => w.write_header(header.inner())?,
            Sink::Bgzf(w) => w.write_header(header.inner())?,
        }
        Ok(Self { path, temp, header: header.clone(), sink, records_written: 0 })
    }

    /// Writes one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_record(&mut self, record: &VariantRecord) -> Result<()> {
        let header = self.header.inner();
        match &mut self.sink {
            Sink::Plain(w) => w.write_variant_record(header, record.as_buf())?,
            Sink::Bgzf(w) => w.write_variant_record(header, record.as_buf())?,
        }
        self.records_written += 1;
        Ok(())
    }

    /// Flushes all data and moves the file to its destination, returning the record count.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing or renaming fails.
    pub fn finish(self) -> Result<u64> {
        let Self { path, temp, sink, records_written, .. } = self;
        match sink {
            Sink::Plain(w) => w.into_inner().flush()?,
            Sink::Bgzf(w) => w.into_inner().try_finish()?,
        }
        temp.persist(&path).map_err(|e| e.error)?;
        debug!("Wrote {records_written} records to {}", path.display());
        Ok(records_written)
    }
}
