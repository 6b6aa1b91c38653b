use crate::core::io::store::load_example;
use crate::core::models::system::{ExamplePair, MATRIX_EXTENSION};
use crate::core::voxel::{VoxelGrid, voxelize};
use crate::engine::config::ConfigError;
use crate::engine::error::PipelineError;
use crate::workflows::list_files;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One example read back from disk and rasterized.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelizedExample {
    pub protein_system: String,
    pub ligand_system: String,
    pub grid: VoxelGrid,
    /// `true` for a positive (cognate) pair.
    pub label: bool,
}

impl VoxelizedExample {
    pub fn pair(&self) -> ExamplePair {
        ExamplePair::new(self.protein_system.as_str(), self.ligand_system.as_str())
    }

    pub fn into_parts(self) -> (String, String, VoxelGrid, bool) {
        (
            self.protein_system,
            self.ligand_system,
            self.grid,
            self.label,
        )
    }
}

#[derive(Debug, Clone)]
struct StreamEntry {
    pair: ExamplePair,
    path: PathBuf,
}

/// A lazy, finite iterator over the persisted examples of a folder.
///
/// Files are visited in sorted name order and each one is read and voxelized only
/// when the iterator reaches it. Labels come from the file names, so
/// [`ExampleStream::labels`] never touches file bodies.
#[derive(Debug)]
pub struct ExampleStream {
    entries: std::vec::IntoIter<StreamEntry>,
    resolution: usize,
}

impl ExampleStream {
    /// Lists the `*.csv` examples under `dir`.
    ///
    /// Files whose names do not parse as `{protein}_{ligand}.csv` are skipped with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero resolution and
    /// [`PipelineError::Io`] if the folder cannot be listed.
    pub fn open(dir: impl AsRef<Path>, resolution: usize) -> Result<Self, PipelineError> {
        if resolution == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "grid_resolution",
                reason: "must be positive".to_string(),
            }
            .into());
        }

        let mut entries = Vec::new();
        for path in list_files(dir.as_ref(), Some(MATRIX_EXTENSION))? {
            let pair = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(ExamplePair::from_file_name);
            match pair {
                Some(pair) => entries.push(StreamEntry { pair, path }),
                None => warn!(path = %path.display(), "Skipping file with unexpected name."),
            }
        }

        Ok(Self {
            entries: entries.into_iter(),
            resolution,
        })
    }

    /// Keeps only positive examples.
    pub fn positives_only(mut self) -> Self {
        self.entries = self
            .entries
            .filter(|entry| entry.pair.is_positive())
            .collect::<Vec<_>>()
            .into_iter();
        self
    }

    /// Keeps at most the first `max_examples` remaining examples.
    pub fn limit(mut self, max_examples: usize) -> Self {
        self.entries = self
            .entries
            .take(max_examples)
            .collect::<Vec<_>>()
            .into_iter();
        self
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Pairs still to be yielded, in iteration order.
    pub fn pairs(&self) -> impl Iterator<Item = &ExamplePair> {
        self.entries.as_slice().iter().map(|entry| &entry.pair)
    }

    /// Labels of the examples still to be yielded, in iteration order.
    pub fn labels(&self) -> Vec<bool> {
        self.pairs().map(ExamplePair::is_positive).collect()
    }

    fn load(&self, entry: StreamEntry) -> Result<VoxelizedExample, PipelineError> {
        let matrix = load_example(&entry.path)?;
        let grid = voxelize(&matrix, self.resolution).map_err(|source| PipelineError::Voxel {
            path: entry.path,
            source,
        })?;
        let label = entry.pair.is_positive();
        Ok(VoxelizedExample {
            protein_system: entry.pair.protein_system,
            ligand_system: entry.pair.ligand_system,
            grid,
            label,
        })
    }
}

impl Iterator for ExampleStream {
    type Item = Result<VoxelizedExample, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.next()?;
        Some(self.load(entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl ExactSizeIterator for ExampleStream {}
