//! Call sets and the provenance labels that tag their genotypes in merged records.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::errors::{ConcordError, Result};

/// Extensions stripped when deriving a provenance label, longest first.
const VCF_EXTENSIONS: [&str; 4] = [".vcf.gz", ".vcf.bgz", ".vcf", ".bcf"];

/// Characters that delimit INFO entries and values.
const INFO_DELIMITERS: [char; 3] = [';', '=', ','];

/// A named set of variant calls for one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSet {
    /// Identifier used in output file names and report headings
    pub name: String,
    /// Path to the VCF holding the calls
    pub file: PathBuf,
}

impl CallSet {
    #[must_use]
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), file: file.into() }
    }

    /// The provenance label for this call set's genotypes.
    #[must_use]
    pub fn label(&self) -> String {
        provenance_label(&self.file)
    }
}

/// Derives a provenance label by removing the directory and VCF extension from `path`.
///
/// # Example
/// ```
/// use fgconcord_lib::provenance::provenance_label;
///
/// assert_eq!(provenance_label("/data/sampleX-calls.vcf"), "sampleX-calls");
/// assert_eq!(provenance_label("calls.vcf.gz"), "calls");
/// ```
#[must_use]
pub fn provenance_label<P: AsRef<Path>>(path: P) -> String {
    let name = path
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    for ext in VCF_EXTENSIONS {
        if let Some(stem) = name.strip_suffix(ext) {
            if !stem.is_empty() {
                return stem.to_string();
            }
        }
    }
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}

/// Ensures every label can be stored as an INFO `set` value and no two call sets reduce to
/// the same provenance label.
///
/// # Errors
///
/// Returns [`ConcordError::UnusableLabel`] for a label containing whitespace or an INFO
/// delimiter, or [`ConcordError::ProvenanceCollision`] naming the first colliding pair.
pub fn check_unique_labels(call_sets: &[CallSet]) -> Result<()> {
    let mut seen: HashMap<String, &Path> = HashMap::with_capacity(call_sets.len());
    for call_set in call_sets {
        let label = call_set.label();
        if let Some(character) =
            label.chars().find(|c| c.is_whitespace() || INFO_DELIMITERS.contains(c))
        {
            return Err(ConcordError::UnusableLabel {
                label,
                path: call_set.file.display().to_string(),
                character,
            });
        }
        if let Some(previous) = seen.get(&label) {
            return Err(ConcordError::ProvenanceCollision {
                label,
                first: previous.display().to_string(),
                second: call_set.file.display().to_string(),
            });
        }
        seen.insert(label, &call_set.file);
    }
    Ok(())
}
