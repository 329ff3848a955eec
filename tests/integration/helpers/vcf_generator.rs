//! Test fixtures: small VCFs, references and experiment configurations.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use fgconcord_lib::vcf::VcfReader;

/// Builds a VCF on `chr1` with one or more sample columns.
pub struct VcfBuilder {
    samples: Vec<String>,
    lines: Vec<String>,
}

impl VcfBuilder {
    pub fn new(sample: &str) -> Self {
        Self::with_samples(&[sample])
    }

    pub fn with_samples(samples: &[&str]) -> Self {
        Self { samples: samples.iter().map(ToString::to_string).collect(), lines: Vec::new() }
    }

    /// Adds a biallelic record with the given genotype.
    pub fn site(self, pos: usize, ref_allele: &str, alt: &str, gt: &str) -> Self {
        self.site_calls(pos, ref_allele, alt, &[gt])
    }

    /// Adds a biallelic record with one genotype per sample column.
    pub fn site_calls(mut self, pos: usize, ref_allele: &str, alt: &str, gts: &[&str]) -> Self {
        assert_eq!(gts.len(), self.samples.len(), "one genotype per sample");
        let gts = gts.join("\t");
        self.lines.push(format!("chr1\t{pos}\t.\t{ref_allele}\t{alt}\t50\tPASS\t.\tGT\t{gts}"));
        self
    }

    /// Adds `count` heterozygous A>G SNVs starting at `start`, spaced ten bases apart.
    pub fn hets(mut self, start: usize, count: usize) -> Self {
        for i in 0..count {
            self = self.site(start + i * 10, "A", "G", "0/1");
        }
        self
    }

    pub fn write(self, path: &Path) -> PathBuf {
        let mut text = String::from(
            "##fileformat=VCFv4.2\n\
             ##contig=<ID=chr1,length=100000>\n\
             ##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n",
        );
        writeln!(text, "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\t{}", self.samples.join("\t"))
            .unwrap();
        for line in &self.lines {
            writeln!(text, "{line}").unwrap();
        }
        fs::write(path, text).expect("Failed to write VCF");
        path.to_path_buf()
    }
}

/// Writes a tiny FASTA reference into `dir`.
pub fn create_test_reference(dir: &Path) -> PathBuf {
    let path = dir.join("ref.fa");
    fs::write(&path, ">chr1\nACGTACGTACGTACGT\n").expect("Failed to write reference");
    path
}

/// Writes a configuration with one experiment listing `calls` as (name, file) pairs.
pub fn write_config(
    path: &Path,
    out: Option<&Path>,
    sample: &str,
    reference: &Path,
    calls: &[(&str, &Path)],
) -> PathBuf {
    write_experiments(path, out, &[(sample, reference, calls)])
}

/// Writes a configuration with one experiment per (sample, reference, calls) entry.
pub fn write_experiments(
    path: &Path,
    out: Option<&Path>,
    experiments: &[(&str, &Path, &[(&str, &Path)])],
) -> PathBuf {
    let mut text = String::new();
    if let Some(out) = out {
        writeln!(text, "dir:\n  out: {}", out.display()).unwrap();
    }
    text.push_str("experiments:\n");
    for (sample, reference, calls) in experiments {
        writeln!(text, "  - sample: {sample}\n    ref: {}\n    calls:", reference.display()).unwrap();
        for (name, file) in *calls {
            writeln!(text, "      - name: {name}\n        file: {}", file.display()).unwrap();
        }
    }
    fs::write(path, text).expect("Failed to write config");
    path.to_path_buf()
}

/// Number of data records in a VCF.
pub fn count_records(path: &Path) -> usize {
    VcfReader::from_path(path).expect("Failed to open VCF").map(|r| r.unwrap()).count()
}

/// Runs the `fgconcord` binary with `args`.
pub fn run_fgconcord(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fgconcord"))
        .args(args)
        .output()
        .expect("Failed to run fgconcord")
}
