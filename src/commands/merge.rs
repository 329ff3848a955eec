//! Merge two call sets for one sample, optionally splitting the result.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use fgconcord_lib::compare::check_distinct_outputs;
use fgconcord_lib::merge::merge_call_sets;
use fgconcord_lib::provenance::{CallSet, check_unique_labels, provenance_label};
use fgconcord_lib::split::{SplitPaths, split_merged};
use fgconcord_lib::validation::{ensure_output_dir, validate_files_exist, validate_name};
use log::info;

use super::command::Command;

/// Merges a single pair of call sets.
#[derive(Parser, Debug)]
#[command(
    name = "merge",
    author,
    version,
    about = "\x1b[38;5;173m[MERGE]\x1b[0m \x1b[36mMerge two call sets for one sample\x1b[0m",
    long_about = r#"
Merges the calls two pipelines made for the same sample into one VCF.

Records are matched by contig and position. The merged file has one sample column per call set,
named `<sample>.<label>` where the label is the input file name without its VCF extension, and
every record carries `set=Intersection` or `set=<label>` in its INFO column.

The merged file is written to **<output>/<sample>-<labelA>-<labelB>-combine.vcf** and is reused if it
already exists.

With `--split`, the merged file is also split into:
- **<sample>-<A>-<B>-concordance.vcf**: records where both call sets have the same genotype
- **<sample>-<A>-<B>-discordance.vcf**: records called in the first set that disagree with the second
- **<sample>-<B>-<A>-discordance.vcf**: records called only in the second set

`<A>` and `<B>` are the call set names, which default to the file labels.
"#
)]
pub struct Merge {
    /// Sample whose genotypes are merged
    #[arg(short = 's', long = "sample")]
    pub sample: String,

    /// First call set VCF
    #[arg(short = 'a', long = "first")]
    pub first: PathBuf,

    /// Name of the first call set [default: file label]
    #[arg(long = "first-name")]
    pub first_name: Option<String>,

    /// Second call set VCF
    #[arg(short = 'b', long = "second")]
    pub second: PathBuf,

    /// Name of the second call set [default: file label]
    #[arg(long = "second-name")]
    pub second_name: Option<String>,

    /// Output directory
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Also write the concordant and discordant subsets
    #[arg(long = "split", default_value_t = false)]
    pub split: bool,
}

impl Merge {
    fn call_set(file: &Path, name: Option<&String>) -> CallSet {
        let name = name.cloned().unwrap_or_else(|| provenance_label(file));
        CallSet::new(name, file)
    }
}

impl Command for Merge {
    fn execute(&self, command_line: &str) -> Result<()> {
        info!("Merge");
        info!("  Command line: {command_line}");
        info!("  Sample: {}", self.sample);
        info!("  First: {}", self.first.display());
        info!("  Second: {}", self.second.display());
        info!("  Output: {}", self.output.display());
        info!("  Split: {}", self.split);

        validate_files_exist(&[(&self.first, "first call set"), (&self.second, "second call set")])?;
        validate_name(&self.sample, "sample")?;

        let first = Self::call_set(&self.first, self.first_name.as_ref());
        let second = Self::call_set(&self.second, self.second_name.as_ref());
        validate_name(&first.name, "first-name")?;
        validate_name(&second.name, "second-name")?;
        check_unique_labels(&[first.clone(), second.clone()])?;
        if self.split {
            check_distinct_outputs([(self.sample.as_str(), &first, &second)])?;
        }

        ensure_output_dir(&self.output)?;
        let merged = merge_call_sets(&first, &second, &self.sample, &self.output)?;
        info!("Merged file: {}", merged.display());

        if self.split {
            let paths = SplitPaths::new(&self.output, &self.sample, &first.name, &second.name);
            let (first_label, second_label) = (first.label(), second.label());
            split_merged(&merged, &self.sample, [first_label.as_str(), second_label.as_str()], &paths)?;
        }
        Ok(())
    }
}
