//! Helper utilities for integration tests.

pub mod vcf_generator;

pub use vcf_generator::*;
