//! Splitting a merged pair of call sets into concordant and directional discordant subsets.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fgconcord_vcf::{GenotypeCall, VcfReader, VcfWriter};
use log::info;

use crate::classify::{Classification, classify};
use crate::logging::{OperationTimer, log_split_summary};
use crate::merge::MergedRecord;
use crate::progress::ProgressTracker;

/// The output a merged record is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Both call sets agree
    Concordant,
    /// Called in the first call set and disagreeing with, or absent from, the second
    FirstVsSecond,
    /// Called only in the second call set
    SecondVsFirst,
}

impl Bucket {
    const ALL: [Bucket; 3] = [Self::Concordant, Self::FirstVsSecond, Self::SecondVsFirst];

    fn index(self) -> usize {
        match self {
            Self::Concordant => 0,
            Self::FirstVsSecond => 1,
            Self::SecondVsFirst => 2,
        }
    }
}

/// Chooses the bucket for a pair of provenance calls.
///
/// Discordant records are attributed to the first call set whenever it has a called
/// genotype, so the three buckets never overlap. Records called in neither set are not
/// assigned.
#[must_use]
pub fn assign(calls: &[GenotypeCall; 2]) -> Option<Bucket> {
    match classify(calls) {
        Classification::Concordant => Some(Bucket::Concordant),
        Classification::Discordant if calls[0].called().is_some() => Some(Bucket::FirstVsSecond),
        Classification::Discordant if calls[1].called().is_some() => Some(Bucket::SecondVsFirst),
        Classification::Discordant => None,
    }
}

/// Output paths of the three subsets for one sample and pair of call sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPaths {
    pub concordant: PathBuf,
    pub first_vs_second: PathBuf,
    pub second_vs_first: PathBuf,
}

impl SplitPaths {
    #[must_use]
    pub fn new(out_dir: &Path, sample: &str, first: &str, second: &str) -> Self {
        Self {
            concordant: out_dir.join(format!("{sample}-{first}-{second}-concordance.vcf")),
            first_vs_second: out_dir.join(format!("{sample}-{first}-{second}-discordance.vcf")),
            second_vs_first: out_dir.join(format!("{sample}-{second}-{first}-discordance.vcf")),
        }
    }

    /// The paths in bucket order.
    #[must_use]
    pub fn all(&self) -> [&Path; 3] {
        [&self.concordant, &self.first_vs_second, &self.second_vs_first]
    }

    fn get(&self, bucket: Bucket) -> &Path {
        self.all()[bucket.index()]
    }

    #[must_use]
    pub fn all_exist(&self) -> bool {
        self.all().iter().all(|p| p.exists())
    }
}

/// Number of merged records sent to each output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitCounts {
    pub concordant: u64,
    pub first_vs_second: u64,
    pub second_vs_first: u64,
    /// Records with no called genotype in either set
    pub uncalled: u64,
}

impl SplitCounts {
    fn add(&mut self, bucket: Option<Bucket>) {
        match bucket {
            Some(Bucket::Concordant) => self.concordant += 1,
            Some(Bucket::FirstVsSecond) => self.first_vs_second += 1,
            Some(Bucket::SecondVsFirst) => self.second_vs_first += 1,
            None => self.uncalled += 1,
        }
    }
}

/// Splits a merged file into the outputs named by `paths`.
///
/// `labels` are the provenance labels used when the file was merged and `sample` the sample
/// whose columns were merged. Outputs that already exist are left untouched; when all three
/// exist the merged file is not read and `None` is returned.
///
/// # Errors
///
/// Returns an error if the merged file cannot be read or an output cannot be written.
pub fn split_merged(
    merged_path: &Path,
    sample: &str,
    labels: [&str; 2],
    paths: &SplitPaths,
) -> Result<Option<SplitCounts>> {
    if paths.all_exist() {
        for path in paths.all() {
            info!("Reusing existing output {}", path.display());
        }
        return Ok(None);
    }

    let reader = VcfReader::from_path(merged_path)
        .with_context(|| format!("Failed to open merged file {}", merged_path.display()))?;
    let header = reader.header().clone();
    let names = header.sample_names();
    let columns = labels.map(|label| {
        let column = format!("{sample}.{label}");
        names.iter().position(|n| *n == column)
    });
    let [Some(first_column), Some(second_column)] = columns else {
        anyhow::bail!(
            "Merged file {} has no {sample}.{} and {sample}.{} sample columns (found {})",
            merged_path.display(),
            labels[0],
            labels[1],
            names.join(",")
        );
    };
    let columns = [first_column, second_column];

    let mut writers: Vec<Option<VcfWriter>> = Vec::with_capacity(3);
    for bucket in Bucket::ALL {
        let path = paths.get(bucket);
        if path.exists() {
            info!("Reusing existing output {}", path.display());
            writers.push(None);
        } else {
            let writer = VcfWriter::create(path, &header)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            writers.push(Some(writer));
        }
    }

    let timer = OperationTimer::new(&format!("Splitting {}", merged_path.display()));
    let mut progress = ProgressTracker::new("Split records");
    let mut counts = SplitCounts::default();

    for record in reader {
        let record = record?;
        let merged = MergedRecord::from_merged(record, labels, columns)
            .with_context(|| format!("Failed to read {}", merged_path.display()))?;
        let bucket = assign(&merged.calls);
        counts.add(bucket);
        if let Some(Some(writer)) = bucket.map(|b| &mut writers[b.index()]) {
            writer.write_record(&merged.record)?;
        }
        progress.record(1);
    }

    for (bucket, writer) in Bucket::ALL.into_iter().zip(writers) {
        if let Some(writer) = writer {
            let path = paths.get(bucket);
            writer.finish().with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
    }

    progress.log_final();
    timer.log_completion(progress.count());
    log_split_summary(labels[0], labels[1], &counts);
    Ok(Some(counts))
}
