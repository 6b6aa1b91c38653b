use std::path::PathBuf;
use voxbind::engine::config::{GenerationConfig, Split};

/// Generation of one split, fully resolved.
#[derive(Debug, Clone)]
pub struct GenerationRun {
    pub split: Split,
    pub core_config: GenerationConfig,
}

#[derive(Debug, Clone)]
pub struct InspectConfig {
    pub examples_dir: PathBuf,
    pub grid_resolution: usize,
    pub positives_only: bool,
    pub limit: Option<usize>,
}
