//! YAML experiment configuration.
//!
//! ```yaml
//! dir:
//!   out: results
//! experiments:
//!   - sample: S1
//!     ref: ref/hg19.fa
//!     calls:
//!       - name: callerX
//!         file: calls/x.vcf
//!       - name: callerY
//!         file: calls/y.vcf
//! ```
//!
//! Relative paths are resolved against the directory holding the configuration file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::compare::{check_distinct_outputs, unordered_pairs};
use crate::errors::ConcordError;
use crate::provenance::{CallSet, check_unique_labels};
use crate::validation::validate_name;

/// Output locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirConfig {
    /// Directory for all outputs; the report goes to standard output when absent
    #[serde(default)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSetConfig {
    pub name: String,
    pub file: PathBuf,
}

/// One sample and the call sets to compare for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub sample: String,
    #[serde(rename = "ref")]
    pub reference: PathBuf,
    #[serde(default)]
    pub calls: Vec<CallSetConfig>,
}

impl Experiment {
    /// The experiment's call sets in configuration order.
    #[must_use]
    pub fn call_sets(&self) -> Vec<CallSet> {
        self.calls.iter().map(|c| CallSet::new(c.name.clone(), c.file.clone())).collect()
    }
}

/// A complete comparison run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dir: DirConfig,
    #[serde(default)]
    pub experiments: Vec<Experiment>,
}

fn resolve(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() || path.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

impl Config {
    /// Reads, resolves and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&content).map_err(|e| ConcordError::InvalidConfig {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_paths(base_dir);
        config.validate(path)?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base_dir: &Path) {
        if let Some(out) = self.dir.out.take() {
            self.dir.out = Some(resolve(&out, base_dir));
        }
        for experiment in &mut self.experiments {
            experiment.reference = resolve(&experiment.reference, base_dir);
            for call in &mut experiment.calls {
                call.file = resolve(&call.file, base_dir);
            }
        }
    }

    /// Checks that names are usable in file names and call sets are distinguishable.
    ///
    /// # Errors
    ///
    /// Returns [`ConcordError::InvalidConfig`] or [`ConcordError::ProvenanceCollision`].
    pub fn validate(&self, path: &Path) -> crate::errors::Result<()> {
        let invalid = |reason: String| ConcordError::InvalidConfig { path: path.display().to_string(), reason };

        for (i, experiment) in self.experiments.iter().enumerate() {
            validate_name(&experiment.sample, "sample")
                .map_err(|e| invalid(format!("experiment {}: {e}", i + 1)))?;

            let mut names = HashSet::new();
            for call in &experiment.calls {
                validate_name(&call.name, "call set name")
                    .map_err(|e| invalid(format!("sample {}: {e}", experiment.sample)))?;
                if !names.insert(call.name.as_str()) {
                    return Err(invalid(format!(
                        "sample {} lists call set '{}' more than once",
                        experiment.sample, call.name
                    )));
                }
            }
            check_unique_labels(&experiment.call_sets())?;
        }

        let call_sets: Vec<(&str, Vec<CallSet>)> =
            self.experiments.iter().map(|e| (e.sample.as_str(), e.call_sets())).collect();
        check_distinct_outputs(call_sets.iter().flat_map(|(sample, sets)| {
            unordered_pairs(sets).into_iter().map(move |(first, second)| (*sample, first, second))
        }))
    }

    /// Stem of the configuration file name, used to name the summary report.
    #[must_use]
    pub fn report_name(path: &Path) -> String {
        path.file_stem().map_or_else(|| "fgconcord".to_string(), |s| s.to_string_lossy().into_owned())
    }
}
