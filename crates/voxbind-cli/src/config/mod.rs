mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_extraction_config, build_generation_config, build_inspect_config};
pub use models::InspectConfig;
