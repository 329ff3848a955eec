//! Merging two call sets for one sample into a single position-ordered stream.
//!
//! Records from the two inputs are matched by `(contig, position)`. Records at the same
//! position are paired when one REF allele is a prefix of the other; the shorter record's
//! alleles are then extended with the remaining reference bases so both genotypes are
//! expressed against one REF. Every input record appears in exactly one merged record:
//! positions present in only one input, and same-position records that cannot be paired,
//! become merged records whose other provenance is [`GenotypeCall::Absent`].
//!
//! Each merged record is written with two GT-only sample columns named `<sample>.<label>`
//! and an INFO `set` value of `Intersection` or the label of the only contributing call set, which
//! is how absence is recovered when the merged file is read back.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use fgconcord_vcf::record::GT_KEY;
use fgconcord_vcf::{Genotype, GenotypeCall, NO_CALL, VariantRecord, VcfHeader, VcfReader, VcfWriter};
use log::info;
use noodles::vcf::header::record::value::Map;
use noodles::vcf::header::record::value::map::info::{Number, Type};
use noodles::vcf::header::record::value::map::{Format, Info};
use noodles::vcf::variant::record_buf::samples::sample::value::Genotype as GenotypeBuf;

use crate::errors::ConcordError;
use crate::logging::OperationTimer;
use crate::progress::ProgressTracker;
use crate::provenance::{CallSet, check_unique_labels};

/// INFO key recording which call sets contributed to a merged record.
pub const SET_KEY: &str = "set";

/// `set` value for records contributed by both call sets.
pub const INTERSECTION: &str = "Intersection";

/// Suffix of the merged artifact's file stem.
pub const COMBINE_SUFFIX: &str = "-combine";

const SET_DESCRIPTION: &str = "Source call set of the merged record";

/// A record combining the calls of two provenances at one position.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    /// The merged VCF line, with a GT-only sample column per provenance
    pub record: VariantRecord,
    /// The genotype of each provenance, in merge order
    pub calls: [GenotypeCall; 2],
}

impl MergedRecord {
    /// Recovers the provenance calls of a record read back from a merged file.
    ///
    /// `columns` are the sample column indices of the two provenances.
    ///
    /// # Errors
    ///
    /// Returns an error if the `set` value names neither label or a genotype is invalid.
    pub fn from_merged(record: VariantRecord, labels: [&str; 2], columns: [usize; 2]) -> Result<Self> {
        let set = record.info_value(SET_KEY).ok_or_else(|| {
            anyhow!("Merged record at {}:{} has no INFO/{SET_KEY} value", record.chrom(), record.pos())
        })?;
        let present = if set == INTERSECTION {
            [true, true]
        } else if set == labels[0] {
            [true, false]
        } else if set == labels[1] {
            [false, true]
        } else {
            bail!(
                "Merged record at {}:{} has {SET_KEY}={set}, expected {INTERSECTION}, {} or {}",
                record.chrom(),
                record.pos(),
                labels[0],
                labels[1]
            );
        };

        let mut calls = [GenotypeCall::Absent, GenotypeCall::Absent];
        for (i, call) in calls.iter_mut().enumerate() {
            if present[i] {
                *call = record.genotype(columns[i]).map_err(|reason| {
                    anyhow!("Invalid {} genotype at {}:{}: {reason}", labels[i], record.chrom(), record.pos())
                })?;
            }
        }
        Ok(Self { record, calls })
    }
}

/// Sort order of contigs, taken from the headers and extended as new contigs appear.
#[derive(Debug, Clone, Default)]
pub struct ContigOrder {
    ranks: HashMap<String, usize>,
}

impl ContigOrder {
    /// Orders the first header's contigs, then any contigs only the second declares.
    #[must_use]
    pub fn from_headers(first: &VcfHeader, second: &VcfHeader) -> Self {
        let mut order = Self::default();
        for (name, _) in first.contigs().into_iter().chain(second.contigs()) {
            order.rank(&name);
        }
        order
    }

    /// The rank of `contig`, assigning the next rank to a contig not seen before.
    pub fn rank(&mut self, contig: &str) -> usize {
        let next = self.ranks.len();
        *self.ranks.entry(contig.to_string()).or_insert(next)
    }
}

/// Groups consecutive records that share a position.
struct PositionGroups<I> {
    records: I,
    lookahead: Option<VariantRecord>,
    head: Option<Vec<VariantRecord>>,
}

impl<I> PositionGroups<I>
where
    I: Iterator<Item = fgconcord_vcf::Result<VariantRecord>>,
{
    fn new(records: I) -> Self {
        Self { records, lookahead: None, head: None }
    }

    /// Buffers the next position group into `head` if it is empty.
    fn load(&mut self) -> Result<()> {
        if self.head.is_some() {
            return Ok(());
        }
        let first = match self.lookahead.take() {
            Some(record) => record,
            None => match self.records.next() {
                Some(record) => record?,
                None => return Ok(()),
            },
        };

        let mut group = vec![first];
        for next in self.records.by_ref() {
            let next = next?;
            if next.chrom() == group[0].chrom() && next.pos() == group[0].pos() {
                group.push(next);
            } else {
                self.lookahead = Some(next);
                break;
            }
        }
        self.head = Some(group);
        Ok(())
    }
}

/// One input to a [`RecordMerger`].
pub struct MergeSide<I> {
    /// Provenance label of the call set
    pub label: String,
    /// Sample column to take genotypes from
    pub sample_index: usize,
    pub records: I,
}

/// Lazily merges two position-sorted record streams.
pub struct RecordMerger<I> {
    labels: [String; 2],
    sample_indices: [usize; 2],
    first: PositionGroups<I>,
    second: PositionGroups<I>,
    contigs: ContigOrder,
    pending: VecDeque<MergedRecord>,
}

impl<I> RecordMerger<I>
where
    I: Iterator<Item = fgconcord_vcf::Result<VariantRecord>>,
{
    #[must_use]
    pub fn new(first: MergeSide<I>, second: MergeSide<I>, contigs: ContigOrder) -> Self {
        Self {
            labels: [first.label, second.label],
            sample_indices: [first.sample_index, second.sample_index],
            first: PositionGroups::new(first.records),
            second: PositionGroups::new(second.records),
            contigs,
            pending: VecDeque::new(),
        }
    }

    /// Reads the next position from either input into `pending`; false once both are done.
    fn advance(&mut self) -> Result<bool> {
        self.first.load()?;
        self.second.load()?;

        let first_key = self.first.head.as_ref().map(|g| (self.contigs.rank(g[0].chrom()), g[0].pos()));
        let second_key = self.second.head.as_ref().map(|g| (self.contigs.rank(g[0].chrom()), g[0].pos()));

        match (first_key, second_key) {
            (None, None) => return Ok(false),
            (Some(a), Some(b)) if a == b => {
                let first = self.first.head.take().unwrap_or_default();
                let second = self.second.head.take().unwrap_or_default();
                self.pair_groups(&first, &second)?;
            }
            (Some(a), b) if b.is_none_or(|b| a < b) => {
                for record in self.first.head.take().unwrap_or_default() {
                    let merged = self.combine([Some(&record), None])?;
                    self.pending.push_back(merged);
                }
            }
            _ => {
                for record in self.second.head.take().unwrap_or_default() {
                    let merged = self.combine([None, Some(&record)])?;
                    self.pending.push_back(merged);
                }
            }
        }
        Ok(true)
    }

    /// Pairs same-position records with compatible REF alleles, in input order.
    fn pair_groups(&mut self, first: &[VariantRecord], second: &[VariantRecord]) -> Result<()> {
        let mut used = vec![false; second.len()];
        for a in first {
            let partner = (0..second.len())
                .find(|&i| !used[i] && refs_compatible(a.ref_allele(), second[i].ref_allele()));
            let merged = match partner {
                Some(i) => {
                    used[i] = true;
                    self.combine([Some(a), Some(&second[i])])?
                }
                None => self.combine([Some(a), None])?,
            };
            self.pending.push_back(merged);
        }
        for (b, _) in second.iter().zip(used).filter(|(_, used)| !used) {
            let merged = self.combine([None, Some(b)])?;
            self.pending.push_back(merged);
        }
        Ok(())
    }

    /// Builds the merged record for one or two input records at the same position.
    fn combine(&self, sides: [Option<&VariantRecord>; 2]) -> Result<MergedRecord> {
        let present: Vec<&VariantRecord> = sides.iter().flatten().copied().collect();
        let Some(anchor) = present.first() else {
            bail!("Cannot merge an empty set of records");
        };
        let long_ref = present
            .iter()
            .map(|r| r.ref_allele())
            .max_by_key(|r| r.len())
            .unwrap_or(anchor.ref_allele());

        let mut alleles = vec![long_ref.to_string()];
        let mut calls = [GenotypeCall::Absent, GenotypeCall::Absent];
        let mut own_alts: [Option<Vec<String>>; 2] = [None, None];

        for (i, side) in sides.iter().enumerate() {
            let Some(record) = side else { continue };
            let suffix = long_ref.get(record.ref_allele().len()..).unwrap_or_default();
            let alts: Vec<String> =
                record.alt_alleles().iter().map(|a| extend_allele(a, suffix)).collect();
            for alt in &alts {
                if !alleles.contains(alt) {
                    alleles.push(alt.clone());
                }
            }

            let call = record.genotype(self.sample_indices[i]).map_err(|reason| {
                anyhow!("Invalid {} genotype at {}:{}: {reason}", self.labels[i], record.chrom(), record.pos())
            })?;
            calls[i] = match call {
                GenotypeCall::Present(gt) => {
                    GenotypeCall::Present(gt.map_alleles(|a| extend_allele(a, suffix)))
                }
                GenotypeCall::Absent => GenotypeCall::Absent,
            };
            own_alts[i] = Some(alts);
        }

        let mut record =
            VariantRecord::new(anchor.chrom(), anchor.pos(), long_ref).map_err(|reason| anyhow!(reason))?;
        record.set_alt_alleles(alleles[1..].to_vec());
        {
            let buf = record.as_buf_mut();
            if let Some(ids) = present.iter().map(|r| r.as_buf().ids()).find(|ids| !ids.as_ref().is_empty()) {
                *buf.ids_mut() = ids.clone();
            }
            *buf.quality_score_mut() = present.iter().find_map(|r| r.as_buf().quality_score());
            if let Some(filters) =
                present.iter().map(|r| r.as_buf().filters()).find(|f| !f.as_ref().is_empty())
            {
                *buf.filters_mut() = filters.clone();
            }

            // Per-allele INFO values stay valid only when the ALT list is unchanged.
            if let Some(source) = (0..2).find(|&i| own_alts[i].as_deref() == Some(&alleles[1..])) {
                if let Some(r) = sides[source] {
                    *buf.info_mut() = r.as_buf().info().clone();
                }
            }
        }
        let set = match sides {
            [Some(_), Some(_)] => INTERSECTION,
            [Some(_), None] => self.labels[0].as_str(),
            _ => self.labels[1].as_str(),
        };
        record.set_info(SET_KEY, set);

        let ploidy = calls
            .iter()
            .filter_map(|c| match c {
                GenotypeCall::Present(gt) => Some(gt.ploidy()),
                GenotypeCall::Absent => None,
            })
            .max()
            .unwrap_or(2);
        let genotypes = calls
            .iter()
            .map(|call| encode_call(call, &alleles, ploidy))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                anyhow!("Genotype allele missing from merged alleles at {}:{}", record.chrom(), record.pos())
            })?;
        record.set_genotypes(genotypes);

        Ok(MergedRecord { record, calls })
    }
}

impl RecordMerger<VcfReader> {
    /// Opens both call sets and prepares a merger for `sample`.
    ///
    /// Returns the merger and the header of the merged stream.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read, the labels collide, the references
    /// disagree or the sample cannot be found.
    pub fn open(first: &CallSet, second: &CallSet, sample: &str) -> Result<(Self, VcfHeader)> {
        check_unique_labels(&[first.clone(), second.clone()])?;

        let first_reader = VcfReader::from_path(&first.file)
            .with_context(|| format!("Failed to open call set '{}'", first.name))?;
        let second_reader = VcfReader::from_path(&second.file)
            .with_context(|| format!("Failed to open call set '{}'", second.name))?;
        let (h1, h2) = (first_reader.header().clone(), second_reader.header().clone());

        check_reference_compatibility(&h1, &first.file, &h2, &second.file)?;
        let first_index = h1.sample_index(sample, &first.file.display().to_string())?;
        let second_index = h2.sample_index(sample, &second.file.display().to_string())?;

        let labels = [first.label(), second.label()];
        let samples: Vec<String> = labels.iter().map(|l| format!("{sample}.{l}")).collect();
        let header = merged_header(&h1, &h2, &samples);
        let contigs = ContigOrder::from_headers(&h1, &h2);

        let [first_label, second_label] = labels;
        let merger = Self::new(
            MergeSide { label: first_label, sample_index: first_index, records: first_reader },
            MergeSide { label: second_label, sample_index: second_index, records: second_reader },
            contigs,
        );
        Ok((merger, header))
    }
}

impl<I> Iterator for RecordMerger<I>
where
    I: Iterator<Item = fgconcord_vcf::Result<VariantRecord>>,
{
    type Item = Result<MergedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(merged) = self.pending.pop_front() {
                return Some(Ok(merged));
            }
            match self.advance() {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

fn refs_compatible(a: &str, b: &str) -> bool {
    let (a, b) = (a.to_ascii_uppercase(), b.to_ascii_uppercase());
    a.starts_with(&b) || b.starts_with(&a)
}

fn is_symbolic(allele: &str) -> bool {
    allele == "*" || allele == NO_CALL || allele.starts_with('<') || allele.contains(['[', ']'])
}

fn extend_allele(allele: &str, suffix: &str) -> String {
    if suffix.is_empty() || is_symbolic(allele) {
        allele.to_string()
    } else {
        format!("{allele}{suffix}")
    }
}

fn encode_call(call: &GenotypeCall, alleles: &[String], ploidy: usize) -> Option<GenotypeBuf> {
    match call {
        GenotypeCall::Present(gt) => gt.encode(alleles),
        GenotypeCall::Absent => Genotype::no_call(ploidy).encode(alleles),
    }
}

/// Builds the header of a merged file.
///
/// Starts from the first header, adds the second header's contig, INFO, FILTER and ALT
/// declarations that the first lacks, and declares `INFO/set` and `FORMAT/GT` if needed.
#[must_use]
pub fn merged_header(first: &VcfHeader, second: &VcfHeader, samples: &[String]) -> VcfHeader {
    let mut merged = first.with_samples(samples);
    let (header, other) = (merged.inner_mut(), second.inner());

    for (id, contig) in other.contigs() {
        header.contigs_mut().entry(id.clone()).or_insert_with(|| contig.clone());
    }
    for (id, info) in other.infos() {
        header.infos_mut().entry(id.clone()).or_insert_with(|| info.clone());
    }
    for (id, filter) in other.filters() {
        header.filters_mut().entry(id.clone()).or_insert_with(|| filter.clone());
    }
    for (id, alt) in other.alternative_alleles() {
        header.alternative_alleles_mut().entry(id.clone()).or_insert_with(|| alt.clone());
    }

    header
        .infos_mut()
        .entry(SET_KEY.to_string())
        .or_insert_with(|| Map::<Info>::new(Number::Count(1), Type::String, SET_DESCRIPTION));
    header.formats_mut().entry(GT_KEY.to_string()).or_insert_with(|| Map::<Format>::from(GT_KEY));
    merged
}

/// Checks that contigs declared with a length in both headers have the same length.
///
/// # Errors
///
/// Returns [`ConcordError::IncompatibleReference`] for the first contig that disagrees.
pub fn check_reference_compatibility(
    first: &VcfHeader,
    first_path: &Path,
    second: &VcfHeader,
    second_path: &Path,
) -> crate::errors::Result<()> {
    let lengths: HashMap<String, usize> =
        first.contigs().into_iter().filter_map(|(name, len)| len.map(|l| (name, l))).collect();

    for (contig, len) in second.contigs() {
        if let (Some(second_length), Some(&first_length)) = (len, lengths.get(&contig)) {
            if first_length != second_length {
                return Err(ConcordError::IncompatibleReference {
                    contig,
                    first: first_path.display().to_string(),
                    first_length,
                    second: second_path.display().to_string(),
                    second_length,
                });
            }
        }
    }
    Ok(())
}

/// Path of the merged artifact for one sample and pair of call sets.
#[must_use]
pub fn combine_path(out_dir: &Path, sample: &str, first: &CallSet, second: &CallSet) -> PathBuf {
    out_dir.join(format!("{sample}-{}-{}{COMBINE_SUFFIX}.vcf", first.label(), second.label()))
}

/// Merges two call sets for `sample` into `<out_dir>/<sample>-<labelA>-<labelB>-combine.vcf`.
///
/// An existing artifact is reused without being read or checked against the inputs.
///
/// # Errors
///
/// Returns an error if the inputs cannot be merged or the artifact cannot be written.
pub fn merge_call_sets(
    first: &CallSet,
    second: &CallSet,
    sample: &str,
    out_dir: &Path,
) -> Result<PathBuf> {
    let path = combine_path(out_dir, sample, first, second);
    if path.exists() {
        info!("Reusing existing merged file {}", path.display());
        return Ok(path);
    }

    let (merger, header) = RecordMerger::open(first, second, sample)?;
    let timer = OperationTimer::new(&format!("Merging {} and {} for {sample}", first.name, second.name));
    let mut progress = ProgressTracker::new("Merged records");

    let mut writer = VcfWriter::create(&path, &header)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for merged in merger {
        let merged = merged.with_context(|| format!("Failed to merge {} and {}", first.name, second.name))?;
        writer.write_record(&merged.record)?;
        progress.record(1);
    }
    let written = writer.finish().with_context(|| format!("Failed to write {}", path.display()))?;

    progress.log_final();
    timer.log_completion(written);
    Ok(path)
}
