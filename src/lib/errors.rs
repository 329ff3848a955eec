//! Custom error types for fgconcord operations.

use thiserror::Error;

/// Result type alias for fgconcord operations
pub type Result<T> = std::result::Result<T, ConcordError>;

/// Error type for fgconcord operations
#[derive(Error, Debug)]
pub enum ConcordError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "VCF", "YAML")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// Two call sets reduce to the same provenance label
    #[error(
        "Call sets '{first}' and '{second}' share the provenance label '{label}'; \
         rename one of the input files"
    )]
    ProvenanceCollision {
        /// The shared label
        label: String,
        /// Path of the first call set
        first: String,
        /// Path of the second call set
        second: String,
    },

    /// A provenance label cannot be written as an INFO value or sample column suffix
    #[error(
        "Provenance label '{label}' of '{path}' contains '{character}', which cannot appear \
         in an INFO value; rename the input file"
    )]
    UnusableLabel {
        /// The offending label
        label: String,
        /// Path of the call set
        path: String,
        /// The first disallowed character
        character: char,
    },

    /// Two comparisons would write the same output file
    #[error("Comparisons {first} and {second} would both write '{file}'; rename a sample or call set")]
    OutputCollision {
        /// The shared output file name
        file: String,
        /// The comparison that claimed the file first
        first: String,
        /// The comparison that collides with it
        second: String,
    },

    /// Two call sets were produced against different references
    #[error("Contig '{contig}' has length {first_length} in '{first}' but {second_length} in '{second}'")]
    IncompatibleReference {
        /// The contig whose declarations disagree
        contig: String,
        /// Path of the first file
        first: String,
        /// Contig length declared by the first file
        first_length: usize,
        /// Path of the second file
        second: String,
        /// Contig length declared by the second file
        second_length: usize,
    },

    /// The experiment configuration is not usable
    #[error("Invalid configuration '{path}': {reason}")]
    InvalidConfig {
        /// Path to the configuration file
        path: String,
        /// Explanation of the problem
        reason: String,
    },
}
