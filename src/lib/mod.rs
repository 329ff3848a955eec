#![deny(unsafe_code)]
// Clippy lint configuration for CI
// These lints are allowed because:
// - cast_*: Count-to-rate conversions intentionally cast between numeric types
// - missing_*_doc: Documentation improvements tracked separately
// - module_name_repetitions: Types such as `MergedRecord` read better with their module name
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]

//! # fgconcord - variant call set concordance
//!
//! This library compares the genotype calls that different calling pipelines made for the
//! same sample. For every pair of call sets it produces a merged record stream, a
//! concordant subset, two directional discordant subsets and concordance metrics.
//!
//! ## Overview
//!
//! ### Core Functionality
//!
//! - **[`merge`]** - Merging two call sets into one position-ordered stream
//! - **[`classify`]** - Concordant/discordant classification of merged records
//! - **[`split`]** - Writing the concordant and directional discordant subsets
//! - **[`compare`]** - Pairwise orchestration over all call sets of an experiment
//!
//! ### Collaborators
//!
//! - **[`engine`]** - Concordance analysis behind the [`engine::AnalysisEngine`] trait
//! - **[`stats`]** - Per-file variant summaries
//! - **[`report`]** - Text report with rendered tables
//! - **[`config`]** - YAML experiment configuration
//!
//! ### Utilities
//!
//! - **[`provenance`]** - Call sets and provenance labels
//! - **[`validation`]** - Input validation utilities for parameters and files
//! - **[`progress`]** - Progress tracking and logging
//! - **[`logging`]** - Enhanced logging utilities with formatting
//! - **[`metrics`]** - Structured metrics types and file writing utilities
//!
//! ## Quick Start
//!
//! ```no_run
//! use fgconcord_lib::compare::Comparison;
//! use fgconcord_lib::engine::NativeConcordanceEngine;
//! use fgconcord_lib::provenance::CallSet;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let engine = NativeConcordanceEngine;
//! let comparison = Comparison::new(&engine, Path::new("results"));
//! let result = comparison.compare_pair(
//!     "S1",
//!     Path::new("ref.fa"),
//!     &CallSet::new("callerX", "x.vcf"),
//!     &CallSet::new("callerY", "y.vcf"),
//! )?;
//! println!("{}", result.metrics.summary.genotype_concordance);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod compare;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod merge;
pub mod metrics;
pub mod progress;
pub mod provenance;
pub mod report;
pub mod split;
pub mod stats;
pub mod validation;

pub use fgconcord_vcf as vcf;
