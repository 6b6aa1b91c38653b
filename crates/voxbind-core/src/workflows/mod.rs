//! # Workflows Module
//!
//! Top-level entry points of the pipeline. Each workflow validates its
//! configuration, prepares its output folder, dispatches per-item tasks and returns
//! a summary that separates successes from isolated failures.
//!
//! - **Extraction** ([`extract`]) - Raw structure files to per-molecule feature
//!   matrices, partitioned into `train/` and `test/`
//! - **Generation** ([`generate`]) - Positive and sampled negative examples for one
//!   split, written in parallel
//! - **Streaming** ([`stream`]) - Lazily voxelized examples for model consumers

use crate::engine::error::PipelineError;
use std::fs;
use std::path::{Path, PathBuf};

pub mod extract;
pub mod generate;
pub mod stream;

/// Regular files directly under `dir`, sorted by path, optionally filtered by
/// extension.
pub(crate) fn list_files(
    dir: &Path,
    extension: Option<&str>,
) -> Result<Vec<PathBuf>, PipelineError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(PipelineError::io(dir))? {
        let path = entry.map_err(PipelineError::io(dir))?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(wanted) = extension {
            if path.extension().and_then(|ext| ext.to_str()) != Some(wanted) {
                continue;
            }
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Deletes `dir` with everything in it, then creates it empty.
pub(crate) fn recreate_dir(dir: &Path) -> Result<(), PipelineError> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(PipelineError::io(dir))?;
    }
    fs::create_dir_all(dir).map_err(PipelineError::io(dir))
}
