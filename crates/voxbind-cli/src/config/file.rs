use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use voxbind::core::encoding::HydrophobicTypes;
use voxbind::engine::config::NegativeCount;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileExtractionConfig {
    #[serde(rename = "hydrophobic-types")]
    pub hydrophobic_types: Option<HydrophobicTypes>,
    #[serde(rename = "split-index")]
    pub split_index: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileGenerationConfig {
    #[serde(rename = "neg-per-pos")]
    pub neg_per_pos: Option<NegativeCount>,
    pub seed: Option<u64>,
    #[serde(rename = "worker-count")]
    pub worker_count: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileVoxelizationConfig {
    #[serde(rename = "grid-resolution")]
    pub grid_resolution: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(rename = "original-data-folder")]
    pub original_data_folder: Option<PathBuf>,
    #[serde(rename = "extracted-data-folder")]
    pub extracted_data_folder: Option<PathBuf>,
    #[serde(rename = "examples-folder")]
    pub examples_folder: Option<PathBuf>,
    pub extraction: Option<FileExtractionConfig>,
    pub generation: Option<FileGenerationConfig>,
    pub voxelization: Option<FileVoxelizationConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Applies `KEY=VALUE` overrides on top of the file values.
    pub fn apply_set_values(mut self, set_values: &[String]) -> Result<Self> {
        for kv_pair in set_values {
            let (key, value) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let (key, value) = (key.trim(), value.trim());

            match key {
                "original-data-folder" => self.original_data_folder = Some(value.into()),
                "extracted-data-folder" => self.extracted_data_folder = Some(value.into()),
                "examples-folder" => self.examples_folder = Some(value.into()),
                "extraction.hydrophobic-types" => {
                    self.extraction
                        .get_or_insert_with(Default::default)
                        .hydrophobic_types = Some(HydrophobicTypes::new(
                        value.split(',').map(str::trim).filter(|t| !t.is_empty()),
                    ));
                }
                "extraction.split-index" => {
                    self.extraction
                        .get_or_insert_with(Default::default)
                        .split_index = Some(parse_value(key, value, "integer")?);
                }
                "generation.neg-per-pos" => {
                    self.generation
                        .get_or_insert_with(Default::default)
                        .neg_per_pos = Some(value.parse().map_err(|e| {
                        CliError::Config(format!("Invalid value for {}: {}", key, e))
                    })?);
                }
                "generation.seed" => {
                    self.generation.get_or_insert_with(Default::default).seed =
                        Some(parse_value(key, value, "integer")?);
                }
                "generation.worker-count" => {
                    self.generation
                        .get_or_insert_with(Default::default)
                        .worker_count = Some(parse_value(key, value, "integer")?);
                }
                "voxelization.grid-resolution" => {
                    self.voxelization
                        .get_or_insert_with(Default::default)
                        .grid_resolution = Some(parse_value(key, value, "integer")?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(self)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}
