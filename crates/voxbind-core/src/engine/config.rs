use crate::core::encoding::HydrophobicTypes;
use crate::core::models::system::leading_index;
use crate::engine::pairing::PairingError;
use serde::Deserialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_SEED: u64 = 1337;
pub const DEFAULT_SPLIT_INDEX: u64 = 2700;
pub const DEFAULT_GRID_RESOLUTION: usize = 30;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// How many negative examples to draw per positive example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "NegativeCountRepr")]
pub enum NegativeCount {
    /// Every other system in the universe (`|U| - 1`).
    #[default]
    Max,
    Exactly(usize),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NegativeCountRepr {
    Count(usize),
    Keyword(String),
}

impl TryFrom<NegativeCountRepr> for NegativeCount {
    type Error = String;

    fn try_from(repr: NegativeCountRepr) -> Result<Self, Self::Error> {
        match repr {
            NegativeCountRepr::Count(n) => Ok(NegativeCount::Exactly(n)),
            NegativeCountRepr::Keyword(s) => s.parse(),
        }
    }
}

impl FromStr for NegativeCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("max") {
            return Ok(NegativeCount::Max);
        }
        s.parse()
            .map(NegativeCount::Exactly)
            .map_err(|_| format!("expected a non-negative integer or \"max\", got '{}'", s))
    }
}

impl fmt::Display for NegativeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NegativeCount::Max => write!(f, "max"),
            NegativeCount::Exactly(n) => write!(f, "{}", n),
        }
    }
}

impl NegativeCount {
    /// Resolves the count against a universe of `universe_size` systems.
    ///
    /// # Errors
    ///
    /// Returns [`PairingError::RequestedSampleExceedsUniverse`] when more negatives are
    /// requested than there are other systems.
    pub fn resolve(self, universe_size: usize) -> Result<usize, PairingError> {
        let max = universe_size.saturating_sub(1);
        match self {
            NegativeCount::Max => Ok(max),
            NegativeCount::Exactly(n) if n <= max => Ok(n),
            NegativeCount::Exactly(n) => Err(PairingError::RequestedSampleExceedsUniverse {
                requested: n,
                universe: universe_size,
                max,
            }),
        }
    }
}

/// The train/test partition a system belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub const ALL: [Split; 2] = [Split::Train, Split::Test];

    /// Sub-directory name under the extraction root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Assigns systems to a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRule {
    /// Systems whose leading numeric index is below the threshold train; the rest test.
    IndexThreshold(u64),
}

impl Default for SplitRule {
    fn default() -> Self {
        SplitRule::IndexThreshold(DEFAULT_SPLIT_INDEX)
    }
}

impl SplitRule {
    /// Returns `None` when the identifier carries no leading index.
    pub fn assign(&self, system: &str) -> Option<Split> {
        match self {
            SplitRule::IndexThreshold(threshold) => {
                let index = leading_index(system)?;
                Some(if index < *threshold {
                    Split::Train
                } else {
                    Split::Test
                })
            }
        }
    }
}

fn default_worker_count() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

/// Absolute form of `path` with `.` and `..` folded, resolving symlinks when the
/// path exists.
fn comparable_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Rejects a destination that is `source`, lies inside it, or contains it. The
/// destination is recreated destructively, so any overlap would erase its input.
fn ensure_disjoint(
    source: &Path,
    destination: &Path,
    parameter: &'static str,
    source_name: &str,
) -> Result<(), ConfigError> {
    let (source_abs, destination_abs) = (comparable_path(source), comparable_path(destination));
    if source_abs.starts_with(&destination_abs) || destination_abs.starts_with(&source_abs) {
        return Err(ConfigError::InvalidValue {
            parameter,
            reason: format!(
                "'{}' must neither equal, contain nor lie inside {} '{}'",
                destination.display(),
                source_name,
                source.display()
            ),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    pub original_data_folder: PathBuf,
    pub extracted_data_folder: PathBuf,
    pub hydrophobic_types: HydrophobicTypes,
    pub split_rule: SplitRule,
    pub worker_count: usize,
}

impl ExtractionConfig {
    /// Folder holding the extracted matrices of one split.
    pub fn split_folder(&self, split: Split) -> PathBuf {
        self.extracted_data_folder.join(split.dir_name())
    }
}

#[derive(Default)]
pub struct ExtractionConfigBuilder {
    original_data_folder: Option<PathBuf>,
    extracted_data_folder: Option<PathBuf>,
    hydrophobic_types: Option<HydrophobicTypes>,
    split_rule: Option<SplitRule>,
    worker_count: Option<usize>,
}

impl ExtractionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn original_data_folder(mut self, path: PathBuf) -> Self {
        self.original_data_folder = Some(path);
        self
    }
    pub fn extracted_data_folder(mut self, path: PathBuf) -> Self {
        self.extracted_data_folder = Some(path);
        self
    }
    pub fn hydrophobic_types(mut self, types: HydrophobicTypes) -> Self {
        self.hydrophobic_types = Some(types);
        self
    }
    pub fn split_rule(mut self, rule: SplitRule) -> Self {
        self.split_rule = Some(rule);
        self
    }
    pub fn worker_count(mut self, count: usize) -> Self {
        self.worker_count = Some(count);
        self
    }

    pub fn build(self) -> Result<ExtractionConfig, ConfigError> {
        let worker_count = self.worker_count.unwrap_or_else(default_worker_count);
        if worker_count == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "worker_count",
                reason: "must be positive".to_string(),
            });
        }
        let original_data_folder = self
            .original_data_folder
            .ok_or(ConfigError::MissingParameter("original_data_folder"))?;
        let extracted_data_folder = self
            .extracted_data_folder
            .ok_or(ConfigError::MissingParameter("extracted_data_folder"))?;
        ensure_disjoint(
            &original_data_folder,
            &extracted_data_folder,
            "extracted_data_folder",
            "original_data_folder",
        )?;
        Ok(ExtractionConfig {
            original_data_folder,
            extracted_data_folder,
            hydrophobic_types: self.hydrophobic_types.unwrap_or_default(),
            split_rule: self.split_rule.unwrap_or_default(),
            worker_count,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Folder of extracted per-molecule matrices for one split.
    pub extracted_data_folder: PathBuf,
    /// Destination folder; recreated from scratch on every run.
    pub examples_folder: PathBuf,
    pub neg_per_pos: NegativeCount,
    pub seed: u64,
    pub worker_count: usize,
}

#[derive(Default)]
pub struct GenerationConfigBuilder {
    extracted_data_folder: Option<PathBuf>,
    examples_folder: Option<PathBuf>,
    neg_per_pos: Option<NegativeCount>,
    seed: Option<u64>,
    worker_count: Option<usize>,
}

impl GenerationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extracted_data_folder(mut self, path: PathBuf) -> Self {
        self.extracted_data_folder = Some(path);
        self
    }
    pub fn examples_folder(mut self, path: PathBuf) -> Self {
        self.examples_folder = Some(path);
        self
    }
    pub fn neg_per_pos(mut self, count: NegativeCount) -> Self {
        self.neg_per_pos = Some(count);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn worker_count(mut self, count: usize) -> Self {
        self.worker_count = Some(count);
        self
    }

    pub fn build(self) -> Result<GenerationConfig, ConfigError> {
        let worker_count = self.worker_count.unwrap_or_else(default_worker_count);
        if worker_count == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "worker_count",
                reason: "must be positive".to_string(),
            });
        }
        let extracted_data_folder = self
            .extracted_data_folder
            .ok_or(ConfigError::MissingParameter("extracted_data_folder"))?;
        let examples_folder = self
            .examples_folder
            .ok_or(ConfigError::MissingParameter("examples_folder"))?;
        ensure_disjoint(
            &extracted_data_folder,
            &examples_folder,
            "examples_folder",
            "extracted_data_folder",
        )?;
        Ok(GenerationConfig {
            extracted_data_folder,
            examples_folder,
            neg_per_pos: self.neg_per_pos.unwrap_or_default(),
            seed: self.seed.unwrap_or(DEFAULT_SEED),
            worker_count,
        })
    }
}
