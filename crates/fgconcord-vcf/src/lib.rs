#![deny(unsafe_code)]

//! Streaming VCF support for fgconcord.
//!
//! This crate provides:
//! - [`VariantRecord`] - one VCF data line, held as a `noodles` record buffer
//! - [`Genotype`] and [`GenotypeCall`] - per-sample genotype calls resolved to allele strings
//! - [`VcfReader`] - a lazy, single-pass reader over plain or BGZF-compressed VCF
//! - [`VcfWriter`] - a writer that only publishes its output once it is complete
//!
//! Headers and records are decoded and encoded with `noodles`, one record at a time, so
//! files are streamed without being materialized.

pub mod genotype;
pub mod header;
pub mod reader;
pub mod record;
pub mod writer;

use thiserror::Error;

pub use genotype::{Genotype, GenotypeCall, GenotypeKind, NO_CALL};
pub use header::VcfHeader;
pub use reader::VcfReader;
pub use record::{VariantKind, VariantRecord};
pub use writer::VcfWriter;

/// Result type alias for VCF operations
pub type Result<T> = std::result::Result<T, VcfError>;

/// Errors raised while reading or writing VCF files
#[derive(Error, Debug)]
pub enum VcfError {
    /// Underlying I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The header block could not be parsed
    #[error("Invalid VCF header in '{path}': {reason}")]
    InvalidHeader {
        /// Path of the offending file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// A data line could not be parsed
    #[error("Malformed VCF record #{record} in {path}: {reason}")]
    MalformedRecord {
        /// Path of the offending file
        path: String,
        /// 1-based index of the record within the file
        record: usize,
        /// Explanation of the problem
        reason: String,
    },

    /// The requested sample column is not present
    #[error("Sample '{sample}' not found in '{path}' (available: {available})")]
    SampleNotFound {
        /// The sample that was requested
        sample: String,
        /// Path of the file searched
        path: String,
        /// Comma-separated list of the samples in the file
        available: String,
    },
}
