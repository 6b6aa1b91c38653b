use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{GenerationRun, InspectConfig};
use crate::cli::{ConfigArgs, ExtractArgs, GenerateArgs, InspectArgs};
use crate::error::{CliError, Result};
use voxbind::core::encoding::HydrophobicTypes;
use voxbind::engine::config::{
    ExtractionConfig, ExtractionConfigBuilder, GenerationConfigBuilder, SplitRule,
};

fn load_file_config(args: &ConfigArgs) -> Result<FileConfig> {
    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    file_config.apply_set_values(&args.set_values)
}

pub fn build_extraction_config(
    args: &ExtractArgs,
    threads: Option<usize>,
) -> Result<ExtractionConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = load_file_config(&args.config)?;
    let extraction_file = file_config.extraction.take().unwrap_or_default();
    let generation_file = file_config.generation.take().unwrap_or_default();

    let hydrophobic_types = if !args.hydrophobic_types.is_empty() {
        HydrophobicTypes::new(args.hydrophobic_types.iter().map(String::as_str))
    } else {
        extraction_file
            .hydrophobic_types
            .unwrap_or(defaults.hydrophobic_types)
    };
    let split_index = args
        .split_index
        .or(extraction_file.split_index)
        .unwrap_or(defaults.split_index);

    let mut builder = ExtractionConfigBuilder::new()
        .original_data_folder(
            args.original_data_folder
                .clone()
                .or(file_config.original_data_folder)
                .unwrap_or(defaults.original_data_folder),
        )
        .extracted_data_folder(
            args.extracted_data_folder
                .clone()
                .or(file_config.extracted_data_folder)
                .unwrap_or(defaults.extracted_data_folder),
        )
        .hydrophobic_types(hydrophobic_types)
        .split_rule(SplitRule::IndexThreshold(split_index));
    if let Some(count) = threads.or(generation_file.worker_count) {
        builder = builder.worker_count(count);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

/// One generation run per selected split, reading `{extracted}/{split}` and writing
/// `{examples}/{split}`.
pub fn build_generation_config(
    args: &GenerateArgs,
    threads: Option<usize>,
) -> Result<Vec<GenerationRun>> {
    let defaults = DefaultsConfig::default();
    let mut file_config = load_file_config(&args.config)?;
    let generation_file = file_config.generation.take().unwrap_or_default();

    let extracted_root = args
        .extracted_data_folder
        .clone()
        .or(file_config.extracted_data_folder)
        .unwrap_or(defaults.extracted_data_folder);
    let examples_root = args
        .examples_folder
        .clone()
        .or(file_config.examples_folder)
        .unwrap_or(defaults.examples_folder);
    let neg_per_pos = args
        .neg_per_pos
        .or(generation_file.neg_per_pos)
        .unwrap_or(defaults.neg_per_pos);
    let seed = args
        .seed
        .or(generation_file.seed)
        .unwrap_or(defaults.seed);
    let worker_count = threads.or(generation_file.worker_count);

    args.split
        .splits()
        .iter()
        .map(|&split| {
            let mut builder = GenerationConfigBuilder::new()
                .extracted_data_folder(extracted_root.join(split.dir_name()))
                .examples_folder(examples_root.join(split.dir_name()))
                .neg_per_pos(neg_per_pos)
                .seed(seed);
            if let Some(count) = worker_count {
                builder = builder.worker_count(count);
            }
            let core_config = builder
                .build()
                .map_err(|e| CliError::Config(e.to_string()))?;
            Ok(GenerationRun { split, core_config })
        })
        .collect()
}

pub fn build_inspect_config(args: &InspectArgs) -> Result<InspectConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = load_file_config(&args.config)?;
    let voxelization_file = file_config.voxelization.take().unwrap_or_default();

    let grid_resolution = args
        .resolution
        .or(voxelization_file.grid_resolution)
        .unwrap_or(defaults.grid_resolution);
    if grid_resolution == 0 {
        return Err(CliError::Config(
            "`voxelization.grid-resolution` must be positive".to_string(),
        ));
    }

    Ok(InspectConfig {
        examples_dir: args.examples_dir.clone(),
        grid_resolution,
        positives_only: args.positives_only,
        limit: args.limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands, SplitSelection};
    use clap::Parser;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;
    use voxbind::engine::config::{NegativeCount, Split};

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("voxbind.toml");
        fs::write(&path, content).unwrap();
        path
    }

    fn generate_args(argv: &[&str]) -> (GenerateArgs, Option<usize>) {
        let cli = Cli::parse_from(argv);
        match cli.command {
            Commands::Generate(args) => (args, cli.threads),
            _ => panic!("Expected 'generate' subcommand"),
        }
    }

    fn extract_args(argv: &[&str]) -> (ExtractArgs, Option<usize>) {
        let cli = Cli::parse_from(argv);
        match cli.command {
            Commands::Extract(args) => (args, cli.threads),
            _ => panic!("Expected 'extract' subcommand"),
        }
    }

    #[test]
    fn generation_uses_defaults_without_file() {
        let (args, threads) = generate_args(&["voxbind", "generate", "--split", "test"]);

        let runs = build_generation_config(&args, threads).unwrap();

        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert_eq!(run.split, Split::Test);
        let defaults = DefaultsConfig::default();
        assert_eq!(
            run.core_config.extracted_data_folder,
            defaults.extracted_data_folder.join("test")
        );
        assert_eq!(
            run.core_config.examples_folder,
            defaults.examples_folder.join("test")
        );
        assert_eq!(run.core_config.neg_per_pos, NegativeCount::Exactly(10));
        assert_eq!(run.core_config.seed, defaults.seed);
    }

    #[test]
    fn generation_precedence_is_cli_then_set_then_file() {
        let dir = tempdir().unwrap();
        let config = write_config(
            dir.path(),
            r#"
            extracted-data-folder = "from-file/extracted"
            examples-folder = "from-file/examples"

            [generation]
            neg-per-pos = 4
            seed = 5
            worker-count = 6
            "#,
        );
        let config = config.to_str().unwrap();
        let (args, threads) = generate_args(&[
            "voxbind",
            "-j",
            "2",
            "generate",
            "-c",
            config,
            "-S",
            "generation.seed=11",
            "-S",
            "generation.neg-per-pos=3",
            "-n",
            "1",
        ]);
        assert_eq!(args.split, SplitSelection::All);

        let runs = build_generation_config(&args, threads).unwrap();

        assert_eq!(runs.len(), 2);
        for (run, split) in runs.iter().zip([Split::Train, Split::Test]) {
            assert_eq!(run.split, split);
            assert_eq!(
                run.core_config.extracted_data_folder,
                PathBuf::from("from-file/extracted").join(split.dir_name())
            );
            assert_eq!(run.core_config.neg_per_pos, NegativeCount::Exactly(1));
            assert_eq!(run.core_config.seed, 11);
            assert_eq!(run.core_config.worker_count, 2);
        }
    }

    #[test]
    fn zero_workers_is_a_config_error() {
        let (args, _) = generate_args(&["voxbind", "generate", "-S", "generation.worker-count=0"]);
        let result = build_generation_config(&args, None);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn extraction_merges_vocabulary_and_split_index() {
        let dir = tempdir().unwrap();
        let config = write_config(
            dir.path(),
            r#"
            original-data-folder = "raw"

            [extraction]
            hydrophobic-types = ["C", "S"]
            split-index = 50
            "#,
        );
        let (args, threads) = extract_args(&[
            "voxbind",
            "extract",
            "--config",
            config.to_str().unwrap(),
            "--split-index",
            "75",
        ]);

        let extraction = build_extraction_config(&args, threads).unwrap();

        assert_eq!(extraction.original_data_folder, PathBuf::from("raw"));
        assert_eq!(extraction.hydrophobic_types, HydrophobicTypes::new(["C", "S"]));
        assert_eq!(extraction.split_rule, SplitRule::IndexThreshold(75));
    }

    #[test]
    fn cli_hydrophobic_types_replace_file_vocabulary() {
        let (args, _) = extract_args(&[
            "voxbind",
            "extract",
            "--hydrophobic-type",
            "C",
            "--hydrophobic-type",
            "CL",
        ]);
        let extraction = build_extraction_config(&args, Some(1)).unwrap();
        assert_eq!(extraction.hydrophobic_types, HydrophobicTypes::new(["C", "CL"]));
        assert_eq!(extraction.worker_count, 1);
    }

    #[test]
    fn inspect_resolution_falls_back_to_file_then_default() {
        let dir = tempdir().unwrap();
        let config = write_config(dir.path(), "[voxelization]\ngrid-resolution = 12\n");

        let cli = Cli::parse_from(["voxbind", "inspect", "out", "-c", config.to_str().unwrap()]);
        let Commands::Inspect(args) = cli.command else {
            panic!("Expected 'inspect' subcommand");
        };
        assert_eq!(build_inspect_config(&args).unwrap().grid_resolution, 12);

        let cli = Cli::parse_from(["voxbind", "inspect", "out"]);
        let Commands::Inspect(args) = cli.command else {
            panic!("Expected 'inspect' subcommand");
        };
        assert_eq!(
            build_inspect_config(&args).unwrap().grid_resolution,
            DefaultsConfig::default().grid_resolution
        );
    }
}
