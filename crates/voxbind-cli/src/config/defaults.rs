use std::path::PathBuf;
use voxbind::core::encoding::HydrophobicTypes;
use voxbind::engine::config::{
    DEFAULT_GRID_RESOLUTION, DEFAULT_SEED, DEFAULT_SPLIT_INDEX, NegativeCount,
};

pub struct DefaultsConfig {
    pub original_data_folder: PathBuf,
    pub extracted_data_folder: PathBuf,
    pub examples_folder: PathBuf,
    pub hydrophobic_types: HydrophobicTypes,
    pub split_index: u64,
    pub neg_per_pos: NegativeCount,
    pub seed: u64,
    pub grid_resolution: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let data_folder = PathBuf::from("training_data");
        Self {
            original_data_folder: data_folder.join("original"),
            extracted_data_folder: data_folder.join("extracted"),
            examples_folder: data_folder.join("examples"),
            hydrophobic_types: HydrophobicTypes::default(),
            split_index: DEFAULT_SPLIT_INDEX,
            neg_per_pos: NegativeCount::Exactly(10),
            seed: DEFAULT_SEED,
            grid_resolution: DEFAULT_GRID_RESOLUTION,
        }
    }
}
