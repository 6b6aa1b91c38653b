use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::config::ConfigError;
use super::pairing::PairingError;
use crate::core::encoding::EncodingError;
use crate::core::io::store::StoreError;
use crate::core::io::structure::StructureError;
use crate::core::voxel::VoxelError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Pairing failed: {0}")]
    Pairing(#[from] PairingError),

    #[error("Failed to parse structure file '{path}': {source}", path = path.display())]
    Structure {
        path: PathBuf,
        #[source]
        source: StructureError,
    },

    #[error("Failed to encode '{path}': {source}", path = path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: EncodingError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to voxelize '{path}': {source}", path = path.display())]
    Voxel {
        path: PathBuf,
        #[source]
        source: VoxelError,
    },

    #[error("Malformed file name '{path}': {reason}", path = path.display())]
    MalformedFileName { path: PathBuf, reason: &'static str },

    #[error(
        "'{path}' would be extracted to '{target}', which another structure file also maps to",
        path = path.display(),
        target = target.display()
    )]
    DuplicateTarget { path: PathBuf, target: PathBuf },

    #[error("I/O error on '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),
}

impl PipelineError {
    pub(crate) fn io(path: impl AsRef<Path>) -> impl FnOnce(io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        move |source| PipelineError::Io { path, source }
    }

    /// True for failures that abort a whole run instead of a single item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PipelineError::Config(_)
                | PipelineError::Pairing(_)
                | PipelineError::Encoding { .. }
                | PipelineError::WorkerPool(_)
        )
    }
}

/// A failure confined to one system during generation. Other systems still run.
#[derive(Debug, Error)]
#[error("System '{system}' failed: {source}")]
pub struct TaskFailure {
    pub system: String,
    #[source]
    pub source: PipelineError,
}

impl TaskFailure {
    pub fn new(system: impl Into<String>, source: PipelineError) -> Self {
        Self {
            system: system.into(),
            source,
        }
    }
}

/// A failure confined to one raw structure file during extraction.
#[derive(Debug, Error)]
#[error("File '{path}' failed: {source}", path = path.display())]
pub struct FileFailure {
    pub path: PathBuf,
    #[source]
    pub source: PipelineError,
}
