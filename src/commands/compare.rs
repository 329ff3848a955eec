//! Compare every pair of call sets described by an experiment configuration.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fgconcord_lib::compare::run_config;
use fgconcord_lib::config::Config;
use fgconcord_lib::engine::NativeConcordanceEngine;
use fgconcord_lib::logging::OperationTimer;
use fgconcord_lib::validation::validate_file_exists;
use log::info;

use super::command::Command;

/// Runs pairwise concordance for all experiments in a configuration file.
#[derive(Parser, Debug)]
#[command(
    name = "compare",
    author,
    version,
    about = "\x1b[38;5;173m[COMPARE]\x1b[0m \x1b[36mCompare all pairs of call sets for each configured sample\x1b[0m",
    long_about = r#"
Compares the variant calls that different pipelines made for the same sample.

The YAML configuration lists one or more experiments, each with a sample name, a reference and
two or more named call sets:

    dir:
      out: results
    experiments:
      - sample: S1
        ref: ref/hg19.fa
        calls:
          - name: callerX
            file: calls/x.vcf
          - name: callerY
            file: calls/y.vcf

Relative paths are resolved against the directory holding the configuration file.

For every unordered pair of call sets (A, B) the following files are written to the output
directory:
- **<sample>-<labelA>-<labelB>-combine.vcf**: both call sets merged, one sample column per call set
- **<sample>-<A>-<B>-concordance.vcf**: positions where A and B agree
- **<sample>-<A>-<B>-discordance.vcf**: positions called in A that disagree with, or are missing from, B
- **<sample>-<B>-<A>-discordance.vcf**: positions called only in B
- **<sample>-<A>-<B>-concordance.eval**: genotype concordance matrix, plus a `.summary` file

Files that already exist are reused without being recomputed. Delete them to force a rerun.

A report with per-file summaries and concordance tables is written to
**<out>/<config>-summary.txt**, or to standard output if no output directory is configured.
"#
)]
pub struct Compare {
    /// YAML experiment configuration
    #[arg(short = 'c', long = "config")]
    pub config: PathBuf,
}

impl Command for Compare {
    fn execute(&self, command_line: &str) -> Result<()> {
        info!("Compare");
        info!("  Command line: {command_line}");
        info!("  Config: {}", self.config.display());

        validate_file_exists(&self.config, "configuration")?;
        let config = Config::from_file(&self.config)?;
        match &config.dir.out {
            Some(out) => info!("  Output directory: {}", out.display()),
            None => info!("  Output directory: (none, report to stdout)"),
        }
        info!("  Experiments: {}", config.experiments.len());

        let timer = OperationTimer::new("Comparing call sets");
        run_config(&NativeConcordanceEngine, &config, &self.config)?;
        timer.log_elapsed();
        Ok(())
    }
}
