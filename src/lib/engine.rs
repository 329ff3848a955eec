//! Pairwise genotype concordance analysis.
//!
//! The orchestrator talks to the analysis through [`AnalysisEngine`], handing it a
//! [`ConcordanceRequest`] and later reading the metrics the engine wrote. The built-in
//! [`NativeConcordanceEngine`] computes the metrics directly from the two call sets.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::info;

use crate::errors::ConcordError;
use crate::logging::{OperationTimer, log_concordance_summary};
use crate::merge::RecordMerger;
use crate::metrics::writer::write_metrics_auto;
use crate::metrics::{
    ConcordanceCounter, ConcordanceSummaryMetric, GenotypeConcordanceMetric, read_metrics,
};
use crate::progress::ProgressTracker;
use crate::provenance::{CallSet, provenance_label};
use crate::validation::validate_files_exist;

/// Analysis module computing genotype concordance.
pub const GENOTYPE_CONCORDANCE: &str = "GenotypeConcordance";

/// Stratification of the analysis by sample.
pub const STRATIFY_BY_SAMPLE: &str = "Sample";

/// Extension of the metrics file written next to a pair's outputs.
pub const METRICS_EXTENSION: &str = "eval";

/// Parameters of one engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcordanceRequest {
    pub reference: PathBuf,
    /// Metrics file to write
    pub output: PathBuf,
    /// Call set evaluated against `comp`
    pub eval: PathBuf,
    pub comp: PathBuf,
    pub sample: String,
    pub module: String,
    pub stratify: String,
}

impl ConcordanceRequest {
    /// A genotype concordance request stratified by sample.
    #[must_use]
    pub fn genotype_concordance(
        reference: &Path,
        output: &Path,
        eval: &Path,
        comp: &Path,
        sample: &str,
    ) -> Self {
        Self {
            reference: reference.to_path_buf(),
            output: output.to_path_buf(),
            eval: eval.to_path_buf(),
            comp: comp.to_path_buf(),
            sample: sample.to_string(),
            module: GENOTYPE_CONCORDANCE.to_string(),
            stratify: STRATIFY_BY_SAMPLE.to_string(),
        }
    }
}

/// Something that can compute pairwise concordance metrics.
pub trait AnalysisEngine {
    /// Runs the analysis, writing its metrics to `request.output`.
    ///
    /// # Errors
    ///
    /// Returns an error if the analysis cannot be run or its output written.
    fn evaluate(&self, request: &ConcordanceRequest) -> Result<()>;
}

/// Path of the summary written alongside a metrics file.
#[must_use]
pub fn summary_path(metrics_path: &Path) -> PathBuf {
    let mut name = OsString::from(metrics_path.as_os_str());
    name.push(".summary");
    PathBuf::from(name)
}

/// Path of the metrics file derived from a pair's first output.
#[must_use]
pub fn metrics_path(first_output: &Path) -> PathBuf {
    first_output.with_extension(METRICS_EXTENSION)
}

/// Concordance metrics for one pair, as read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcordanceMetrics {
    /// One row per (eval, comp) genotype type
    pub table: Vec<GenotypeConcordanceMetric>,
    pub summary: ConcordanceSummaryMetric,
}

impl ConcordanceMetrics {
    /// Reads the metrics file and its summary.
    ///
    /// # Errors
    ///
    /// Returns an error if either file is missing, malformed or the summary is empty.
    pub fn read(path: &Path) -> Result<Self> {
        let table = read_metrics(path)?;
        let summary_file = summary_path(path);
        let summary = read_metrics::<_, ConcordanceSummaryMetric>(&summary_file)?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No concordance summary in {}", summary_file.display()))?;
        Ok(Self { table, summary })
    }
}

/// Computes concordance by merging the two call sets in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeConcordanceEngine;

impl NativeConcordanceEngine {
    fn check_request(request: &ConcordanceRequest) -> crate::errors::Result<()> {
        if request.module != GENOTYPE_CONCORDANCE {
            return Err(ConcordError::InvalidParameter {
                parameter: "module".to_string(),
                reason: format!("unsupported analysis module '{}'", request.module),
            });
        }
        if request.stratify != STRATIFY_BY_SAMPLE {
            return Err(ConcordError::InvalidParameter {
                parameter: "stratify".to_string(),
                reason: format!("unsupported stratification '{}'", request.stratify),
            });
        }
        validate_files_exist(&[
            (&request.reference, "Reference"),
            (&request.eval, "Eval VCF"),
            (&request.comp, "Comp VCF"),
        ])
    }
}

impl AnalysisEngine for NativeConcordanceEngine {
    fn evaluate(&self, request: &ConcordanceRequest) -> Result<()> {
        Self::check_request(request)?;

        let eval = CallSet::new(provenance_label(&request.eval), &request.eval);
        let comp = CallSet::new(provenance_label(&request.comp), &request.comp);
        let timer = OperationTimer::new(&format!(
            "Evaluating concordance of {} against {}",
            eval.name, comp.name
        ));

        let (merger, _) = RecordMerger::open(&eval, &comp, &request.sample)?;
        let mut counter = ConcordanceCounter::new();
        let mut progress = ProgressTracker::new("Evaluated sites");
        for merged in merger {
            let merged = merged?;
            let [e, c] = &merged.calls;
            let ref_allele = merged.record.ref_allele();
            let same = matches!((e.called(), c.called()), (Some(a), Some(b)) if a == b);
            counter.add(e.kind(ref_allele), c.kind(ref_allele), same);
            progress.record(1);
        }
        progress.log_final();

        let summary = counter.summarize(&request.sample, &eval.name, &comp.name);
        log_concordance_summary(&summary);

        // The matrix is published last: its presence marks the metrics as complete.
        let summary_file = summary_path(&request.output);
        write_metrics_auto(&summary_file, &[summary])?;
        let dir = match request.output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let temp = tempfile::Builder::new()
            .prefix(".fgconcord-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        write_metrics_auto(temp.path(), &counter.to_table(&request.sample))?;
        temp.persist(&request.output)
            .with_context(|| format!("Failed to write {}", request.output.display()))?;

        info!("Wrote concordance metrics to {}", request.output.display());
        timer.log_completion(counter.sites());
        Ok(())
    }
}
