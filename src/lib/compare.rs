//! Pairwise comparison of every call set of an experiment.
//!
//! Each unordered pair of call sets is merged, split into concordant and directional
//! discordant subsets, and evaluated by an [`AnalysisEngine`]. Every step first checks for
//! its output on disk and reuses it when present; the existence check does not look at the
//! inputs, so outputs from an earlier run with different inputs are reused as they are.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;

use crate::config::{Config, Experiment};
use crate::engine::{AnalysisEngine, ConcordanceMetrics, ConcordanceRequest, metrics_path, summary_path};
use crate::errors::ConcordError;
use crate::merge::{combine_path, merge_call_sets};
use crate::provenance::{CallSet, check_unique_labels};
use crate::report::Report;
use crate::split::{SplitPaths, split_merged};
use crate::stats::summarize_vcf;
use crate::validation::ensure_output_dir;

/// All unordered pairs of `items`, without self-pairs, in input order.
///
/// # Example
/// ```
/// use fgconcord_lib::compare::unordered_pairs;
///
/// let pairs = unordered_pairs(&["a", "b", "c"]);
/// assert_eq!(pairs, vec![(&"a", &"b"), (&"a", &"c"), (&"b", &"c")]);
/// assert!(unordered_pairs(&["a"]).is_empty());
/// ```
#[must_use]
pub fn unordered_pairs<T>(items: &[T]) -> Vec<(&T, &T)> {
    items.iter().tuple_combinations().collect()
}

/// Every file written for one sample and pair of call sets, in the order they are produced.
#[must_use]
pub fn pair_outputs(out_dir: &Path, sample: &str, first: &CallSet, second: &CallSet) -> Vec<PathBuf> {
    let split = SplitPaths::new(out_dir, sample, &first.name, &second.name);
    let metrics = metrics_path(&split.concordant);
    let mut outputs = vec![combine_path(out_dir, sample, first, second)];
    outputs.extend(split.all().iter().map(|p| p.to_path_buf()));
    outputs.push(summary_path(&metrics));
    outputs.push(metrics);
    outputs
}

/// Ensures no two comparisons, nor two outputs of one comparison, share a file name.
///
/// Outputs are reused whenever their file exists, so a shared name would silently hand one
/// comparison the results of another.
///
/// # Errors
///
/// Returns [`ConcordError::OutputCollision`] for the first file name claimed twice.
pub fn check_distinct_outputs<'a, I>(pairs: I) -> crate::errors::Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a CallSet, &'a CallSet)>,
{
    let mut owners: HashMap<PathBuf, String> = HashMap::new();
    for (sample, first, second) in pairs {
        let owner = format!("{} vs {} for {sample}", first.name, second.name);
        for file in pair_outputs(Path::new(""), sample, first, second) {
            match owners.entry(file) {
                Entry::Occupied(entry) => {
                    return Err(ConcordError::OutputCollision {
                        file: entry.key().display().to_string(),
                        first: entry.get().clone(),
                        second: owner,
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(owner.clone());
                }
            }
        }
    }
    Ok(())
}

/// Outputs produced for one pair of call sets.
#[derive(Debug, Clone)]
pub struct PairResult {
    pub merged: PathBuf,
    pub split: SplitPaths,
    pub metrics: ConcordanceMetrics,
}

/// Runs pairwise comparisons into one output directory.
pub struct Comparison<'a> {
    engine: &'a dyn AnalysisEngine,
    out_dir: &'a Path,
}

impl<'a> Comparison<'a> {
    #[must_use]
    pub fn new(engine: &'a dyn AnalysisEngine, out_dir: &'a Path) -> Self {
        Self { engine, out_dir }
    }

    /// Merges, splits and evaluates one pair of call sets for `sample`.
    ///
    /// # Errors
    ///
    /// Returns an error from the first step that fails.
    pub fn compare_pair(
        &self,
        sample: &str,
        reference: &Path,
        first: &CallSet,
        second: &CallSet,
    ) -> Result<PairResult> {
        info!("Comparing {} and {} for {sample}", first.name, second.name);

        let merged = merge_call_sets(first, second, sample, self.out_dir)?;

        let split = SplitPaths::new(self.out_dir, sample, &first.name, &second.name);
        let (first_label, second_label) = (first.label(), second.label());
        split_merged(&merged, sample, [first_label.as_str(), second_label.as_str()], &split)?;

        let metrics_file = metrics_path(&split.concordant);
        if metrics_file.exists() {
            info!("Reusing existing metrics {}", metrics_file.display());
        } else {
            let request = ConcordanceRequest::genotype_concordance(
                reference,
                &metrics_file,
                &first.file,
                &second.file,
                sample,
            );
            self.engine.evaluate(&request)?;
        }
        let metrics = ConcordanceMetrics::read(&metrics_file)?;

        Ok(PairResult { merged, split, metrics })
    }

    /// Compares every pair of the experiment's call sets and appends the results to `report`.
    ///
    /// Returns the number of pairs compared. The first failing pair aborts the experiment.
    ///
    /// # Errors
    ///
    /// Returns an error if any pair fails or the report cannot be written.
    pub fn run_experiment<W: Write>(
        &self,
        experiment: &Experiment,
        report: &mut Report<W>,
    ) -> Result<usize> {
        let call_sets = experiment.call_sets();
        check_unique_labels(&call_sets)?;
        let pairs = unordered_pairs(&call_sets);
        info!(
            "Sample {}: {} call sets, {} pairs",
            experiment.sample,
            call_sets.len(),
            pairs.len()
        );

        report.sample_heading(&experiment.sample)?;
        for (first, second) in &pairs {
            let result = self
                .compare_pair(&experiment.sample, &experiment.reference, first, second)
                .with_context(|| {
                    format!(
                        "Failed to compare {} and {} for sample {}",
                        first.name, second.name, experiment.sample
                    )
                })?;

            report.pair_heading(&first.name, &second.name)?;
            for path in result.split.all() {
                let summary = summarize_vcf(path)?;
                report.output_summary(path, &summary)?;
            }
            report.concordance(&result.metrics)?;
        }
        Ok(pairs.len())
    }
}

/// Runs every experiment of a configuration, writing the report to
/// `<out>/<config stem>-summary.txt`, or to standard output when no output directory is set.
///
/// Outputs go to the configured directory, or to the directory holding the configuration.
///
/// # Errors
///
/// Returns an error if any experiment fails.
pub fn run_config(engine: &dyn AnalysisEngine, config: &Config, config_path: &Path) -> Result<()> {
    let (out_dir, report_path) = match &config.dir.out {
        Some(dir) => {
            let name = format!("{}-summary.txt", Config::report_name(config_path));
            (dir.clone(), Some(dir.join(name)))
        }
        None => {
            let dir = config_path.parent().filter(|p| !p.as_os_str().is_empty());
            (dir.map_or_else(|| PathBuf::from("."), Path::to_path_buf), None)
        }
    };
    ensure_output_dir(&out_dir)?;

    let mut report = Report::open(report_path.as_deref())?;
    let comparison = Comparison::new(engine, &out_dir);
    let mut total = 0;
    for experiment in &config.experiments {
        total += comparison.run_experiment(experiment, &mut report)?;
    }
    report.finish()?;

    match report_path {
        Some(path) => info!("Compared {total} pairs; report written to {}", path.display()),
        None => info!("Compared {total} pairs"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CallSetConfig;
    use crate::engine::NativeConcordanceEngine;
    use fgconcord_vcf::VcfReader;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Records every request before delegating to the native engine.
    #[derive(Default)]
    struct CountingEngine {
        requests: RefCell<Vec<ConcordanceRequest>>,
    }

    impl AnalysisEngine for CountingEngine {
        fn evaluate(&self, request: &ConcordanceRequest) -> Result<()> {
            self.requests.borrow_mut().push(request.clone());
            NativeConcordanceEngine.evaluate(request)
        }
    }

    const HEADER: &str = "##fileformat=VCFv4.2\n\
##contig=<ID=chr1,length=1000>\n\
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\n";

    fn write_vcf(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let body: String = lines.iter().map(|l| format!("{l}\n")).collect();
        fs::write(&path, format!("{HEADER}{body}")).unwrap();
        path
    }

    fn experiment(dir: &Path, n: usize) -> Experiment {
        let reference = dir.join("ref.fa");
        fs::write(&reference, ">chr1\nACGT\n").unwrap();
        let calls = (0..n)
            .map(|i| {
                let name = format!("caller{i}");
                let file = write_vcf(dir, &format!("{name}.vcf"), &["chr1\t100\t.\tA\tT\t.\tPASS\t.\tGT\t0/1"]);
                CallSetConfig { name, file }
            })
            .collect();
        Experiment { sample: "S1".to_string(), reference, calls }
    }

    #[test]
    fn test_pair_counts() {
        assert_eq!(unordered_pairs::<u8>(&[]).len(), 0);
        assert_eq!(unordered_pairs(&[1]).len(), 0);
        assert_eq!(unordered_pairs(&[1, 2, 3]).len(), 3);
        assert_eq!(unordered_pairs(&[1, 2, 3, 4, 5]).len(), 10);
        assert!(unordered_pairs(&[1, 2, 3, 4]).iter().all(|(a, b)| a != b));
    }

    #[test]
    fn test_run_experiment_three_call_sets() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        let experiment = experiment(dir.path(), 3);

        let engine = CountingEngine::default();
        let mut report = Report::new(Vec::new());
        let pairs = Comparison::new(&engine, &out).run_experiment(&experiment, &mut report).unwrap();

        assert_eq!(pairs, 3);
        assert_eq!(engine.requests.borrow().len(), 3);
        let text = String::from_utf8(report.finish().unwrap()).unwrap();
        assert_eq!(text.matches("** ").count(), 3);
        assert!(text.contains("** caller0 and caller2"));
    }

    #[test]
    fn test_single_call_set_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let experiment = experiment(dir.path(), 1);
        let engine = CountingEngine::default();
        let mut report = Report::new(Vec::new());
        let pairs =
            Comparison::new(&engine, dir.path()).run_experiment(&experiment, &mut report).unwrap();
        assert_eq!(pairs, 0);
        assert!(engine.requests.borrow().is_empty());
    }

    #[test]
    fn test_rerun_reuses_outputs() {
        let dir = TempDir::new().unwrap();
        let experiment = experiment(dir.path(), 2);
        let sets = experiment.call_sets();

        let engine = CountingEngine::default();
        let comparison = Comparison::new(&engine, dir.path());
        let first = comparison.compare_pair("S1", &experiment.reference, &sets[0], &sets[1]).unwrap();
        let modified = fs::metadata(&first.split.concordant).unwrap().modified().unwrap();

        let second = comparison.compare_pair("S1", &experiment.reference, &sets[0], &sets[1]).unwrap();
        assert_eq!(engine.requests.borrow().len(), 1);
        assert_eq!(first.metrics, second.metrics);
        assert_eq!(fs::metadata(&second.split.concordant).unwrap().modified().unwrap(), modified);
    }

    #[test]
    fn test_engine_request() {
        let dir = TempDir::new().unwrap();
        let experiment = experiment(dir.path(), 2);
        let sets = experiment.call_sets();
        let engine = CountingEngine::default();
        Comparison::new(&engine, dir.path())
            .compare_pair("S1", &experiment.reference, &sets[0], &sets[1])
            .unwrap();

        let requests = engine.requests.borrow();
        let request = &requests[0];
        assert_eq!(request.module, "GenotypeConcordance");
        assert_eq!(request.stratify, "Sample");
        assert_eq!(request.eval, sets[0].file);
        assert_eq!(request.comp, sets[1].file);
        assert_eq!(request.output, dir.path().join("S1-caller0-caller1-concordance.eval"));
    }

    #[test]
    fn test_failure_aborts_experiment() {
        let dir = TempDir::new().unwrap();
        let mut experiment = experiment(dir.path(), 3);
        experiment.calls[1].file = dir.path().join("missing.vcf");

        let engine = CountingEngine::default();
        let mut report = Report::new(Vec::new());
        let err = Comparison::new(&engine, dir.path())
            .run_experiment(&experiment, &mut report)
            .unwrap_err();
        assert!(format!("{err:#}").contains("Failed to compare caller0 and caller1"));
        assert!(engine.requests.borrow().is_empty());
    }

    #[test]
    fn test_pair_outputs() {
        let x = CallSet::new("callerX", "/d/x.vcf");
        let y = CallSet::new("callerY", "/d/y.vcf.gz");
        let names: Vec<PathBuf> = pair_outputs(Path::new("out"), "S1", &x, &y);
        let expected = [
            "out/S1-x-y-combine.vcf",
            "out/S1-callerX-callerY-concordance.vcf",
            "out/S1-callerX-callerY-discordance.vcf",
            "out/S1-callerY-callerX-discordance.vcf",
            "out/S1-callerX-callerY-concordance.eval.summary",
            "out/S1-callerX-callerY-concordance.eval",
        ];
        assert_eq!(names, expected.iter().map(PathBuf::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_hyphenated_names_that_collide_are_rejected() {
        let sets = [
            CallSet::new("a-b", "/d/one.vcf"),
            CallSet::new("c", "/d/two.vcf"),
            CallSet::new("a", "/d/three.vcf"),
            CallSet::new("b-c", "/d/four.vcf"),
        ];
        let pairs = unordered_pairs(&sets);
        let err = check_distinct_outputs(pairs.iter().map(|(a, b)| ("S", *a, *b))).unwrap_err();
        match err {
            ConcordError::OutputCollision { file, first, second } => {
                assert_eq!(file, "S-a-b-c-concordance.vcf");
                assert_eq!(first, "a-b vs c for S");
                assert_eq!(second, "a vs b-c for S");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_distinct_samples_do_not_collide() {
        let sets = [CallSet::new("callerX", "/d/x.vcf"), CallSet::new("callerY", "/d/y.vcf")];
        let pairs = [("S1", &sets[0], &sets[1]), ("S2", &sets[0], &sets[1])];
        assert!(check_distinct_outputs(pairs).is_ok());
        let repeated = [("S1", &sets[0], &sets[1]), ("S1", &sets[0], &sets[1])];
        assert!(check_distinct_outputs(repeated).is_err());
    }

    #[test]
    fn test_two_experiments_share_an_output_dir() {
        let dir = TempDir::new().unwrap();
        let header = HEADER.replace("\tS1\n", "\tS1\tS2\n");
        let write = |name: &str, gts: &str| {
            let path = dir.path().join(name);
            fs::write(&path, format!("{header}chr1\t100\t.\tA\tT\t.\tPASS\t.\tGT\t{gts}\n")).unwrap();
            path
        };
        let x = write("x.vcf", "0/1\t0/1");
        let y = write("y.vcf", "0/1\t1/1");
        let reference = dir.path().join("ref.fa");
        fs::write(&reference, ">chr1\nACGT\n").unwrap();
        let calls = vec![
            CallSetConfig { name: "callerX".to_string(), file: x },
            CallSetConfig { name: "callerY".to_string(), file: y },
        ];
        let experiment = |sample: &str| Experiment {
            sample: sample.to_string(),
            reference: reference.clone(),
            calls: calls.clone(),
        };

        let engine = CountingEngine::default();
        let comparison = Comparison::new(&engine, dir.path());
        let mut report = Report::new(Vec::new());
        comparison.run_experiment(&experiment("S1"), &mut report).unwrap();
        comparison.run_experiment(&experiment("S2"), &mut report).unwrap();

        assert_eq!(engine.requests.borrow().len(), 2);
        let s1 = SplitPaths::new(dir.path(), "S1", "callerX", "callerY");
        let s2 = SplitPaths::new(dir.path(), "S2", "callerX", "callerY");
        let count = |path: &Path| VcfReader::from_path(path).unwrap().count();
        assert_eq!((count(&s1.concordant), count(&s1.first_vs_second)), (1, 0));
        assert_eq!((count(&s2.concordant), count(&s2.first_vs_second)), (0, 1));
        assert!(dir.path().join("S1-x-y-combine.vcf").exists());
        assert!(dir.path().join("S2-x-y-combine.vcf").exists());
    }
}
