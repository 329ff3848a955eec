//! Human-readable comparison report.
//!
//! The report has one `* <sample>` heading per experiment and one `** <A> and <B>` heading
//! per pair of call sets. Under each pair heading come the base name and summary table of
//! each output file, then the pair's concordance tables.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use fgconcord_vcf::GenotypeKind;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::engine::ConcordanceMetrics;
use crate::logging::format_percent;
use crate::metrics::{VariantSummaryMetric, format_count};

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct MatrixRow {
    #[tabled(rename = "Eval \\ Comp")]
    eval: &'static str,
    #[tabled(rename = "HOM_REF")]
    hom_ref: u64,
    #[tabled(rename = "HET")]
    het: u64,
    #[tabled(rename = "HOM_VAR")]
    hom_var: u64,
    #[tabled(rename = "NO_CALL")]
    no_call: u64,
    #[tabled(rename = "UNAVAILABLE")]
    unavailable: u64,
}

fn render<T: Tabled>(rows: &[T]) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Renders a variant summary as a two-column metric/value table.
#[must_use]
pub fn render_variant_summary(summary: &VariantSummaryMetric) -> String {
    let rows: Vec<MetricRow> =
        summary.rows().into_iter().map(|(metric, value)| MetricRow { metric, value }).collect();
    render(&rows)
}

/// Renders the genotype type matrix followed by the headline rates.
#[must_use]
pub fn render_concordance(metrics: &ConcordanceMetrics) -> String {
    let count = |eval: GenotypeKind, comp: GenotypeKind| {
        metrics
            .table
            .iter()
            .filter(|r| r.eval_genotype == eval.as_str() && r.comp_genotype == comp.as_str())
            .map(|r| r.count)
            .sum::<u64>()
    };
    let matrix: Vec<MatrixRow> = GenotypeKind::ALL
        .into_iter()
        .map(|eval| MatrixRow {
            eval: eval.as_str(),
            hom_ref: count(eval, GenotypeKind::HomRef),
            het: count(eval, GenotypeKind::Het),
            hom_var: count(eval, GenotypeKind::HomVar),
            no_call: count(eval, GenotypeKind::NoCall),
            unavailable: count(eval, GenotypeKind::Unavailable),
        })
        .collect();

    let s = &metrics.summary;
    let rates = vec![
        MetricRow { metric: "Eval", value: s.eval.clone() },
        MetricRow { metric: "Comp", value: s.comp.clone() },
        MetricRow { metric: "Sites", value: format_count(s.sites) },
        MetricRow { metric: "Called in both", value: format_count(s.both_called) },
        MetricRow { metric: "Concordant", value: format_count(s.both_called_concordant) },
        MetricRow { metric: "Genotype concordance", value: format_percent(s.genotype_concordance, 2) },
        MetricRow { metric: "Non-ref sensitivity", value: format_percent(s.non_ref_sensitivity, 2) },
        MetricRow { metric: "Non-ref discrepancy", value: format_percent(s.non_ref_discrepancy, 2) },
    ];

    format!("{}\n{}", render(&matrix), render(&rates))
}

/// Writes report sections to a file or standard output.
pub struct Report<W: Write> {
    out: W,
}

impl Report<Box<dyn Write>> {
    /// Opens `path` for the report, or standard output when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let out: Box<dyn Write> = match path {
            Some(p) => Box::new(BufWriter::new(
                File::create(p).with_context(|| format!("Failed to create report {}", p.display()))?,
            )),
            None => Box::new(BufWriter::new(io::stdout())),
        };
        Ok(Self::new(out))
    }
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn sample_heading(&mut self, sample: &str) -> io::Result<()> {
        writeln!(self.out, "* {sample}")
    }

    pub fn pair_heading(&mut self, first: &str, second: &str) -> io::Result<()> {
        writeln!(self.out, "** {first} and {second}")
    }

    /// Writes an output file's base name followed by its summary table.
    pub fn output_summary(&mut self, path: &Path, summary: &VariantSummaryMetric) -> io::Result<()> {
        let name = path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        writeln!(self.out, "{name}")?;
        writeln!(self.out, "{}", render_variant_summary(summary))
    }

    pub fn concordance(&mut self, metrics: &ConcordanceMetrics) -> io::Result<()> {
        writeln!(self.out, "{}", render_concordance(metrics))
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
