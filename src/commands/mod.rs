//! CLI command implementations for fgconcord.
//!
//! - [`compare`] - Compare every pair of call sets listed in a YAML configuration
//! - [`merge`] - Merge (and optionally split) a single pair of call sets

// Blanket clippy pedantic allows for command implementations.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::uninlined_format_args
)]

pub mod command;
pub mod compare;
pub mod merge;
