use super::CommandOutcome;
use crate::cli::GenerateArgs;
use crate::config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use tracing::info;
use voxbind::engine::progress::{Progress, ProgressReporter};
use voxbind::workflows;

pub fn run(args: GenerateArgs, threads: Option<usize>) -> Result<CommandOutcome> {
    info!("Merging configuration from file and CLI arguments...");
    let runs = config::build_generation_config(&args, threads)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    // Every split is paired before any examples folder is recreated.
    reporter.report(Progress::Message("Pairing systems...".to_string()));
    let prepared = runs
        .iter()
        .map(|run| workflows::generate::prepare(&run.core_config))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut failures = 0;
    for (run, plan) in runs.iter().zip(&prepared) {
        let core = &run.core_config;
        println!(
            "Generating {} examples ({} negative(s) per positive, seed {}) into {}...",
            run.split,
            core.neg_per_pos,
            core.seed,
            core.examples_folder.display()
        );
        info!(split = %run.split, "Invoking the generation workflow...");

        let summary = workflows::generate::execute(core, plan, &reporter)?;

        println!(
            "✓ {}: {} system(s), {} positive and {} negative example(s) written, {} skipped.",
            run.split,
            summary.systems,
            summary.positives_written(),
            summary.negatives_written(),
            summary.skipped()
        );
        for failure in &summary.failures {
            eprintln!("  ✗ {}", failure);
        }
        failures += summary.failures.len();
    }

    Ok(CommandOutcome::from_failures(failures))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::error::CliError;
    use clap::Parser;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;
    use voxbind::core::io::store::save_molecule;
    use voxbind::core::models::matrix::{MoleculeClass, MoleculeMatrix};
    use voxbind::engine::error::PipelineError;

    fn seed_split(dir: &Path, systems: usize) {
        fs::create_dir_all(dir).unwrap();
        for i in 1..=systems {
            let system = format!("{:04}", i);
            for class in [MoleculeClass::Protein, MoleculeClass::Ligand] {
                let matrix =
                    MoleculeMatrix::from_rows(&[[i as f64, 0.0, 0.0, 1.0, class.flag()]]).unwrap();
                save_molecule(dir, &system, class, &matrix).unwrap();
            }
        }
    }

    fn generate_args(root: &Path, extra: &[&str]) -> GenerateArgs {
        let extracted = root.join("extracted");
        let examples = root.join("examples");
        let mut argv = vec![
            "voxbind".to_string(),
            "generate".to_string(),
            "--extracted".to_string(),
            extracted.display().to_string(),
            "--examples".to_string(),
            examples.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        match Cli::parse_from(argv).command {
            Commands::Generate(args) => args,
            _ => panic!("Expected 'generate' subcommand"),
        }
    }

    #[test]
    fn oversized_request_for_one_split_leaves_every_split_untouched() {
        let root = tempdir().unwrap();
        seed_split(&root.path().join("extracted/train"), 12);
        seed_split(&root.path().join("extracted/test"), 3);
        let train_examples = root.path().join("examples/train");
        fs::create_dir_all(&train_examples).unwrap();
        let previous = train_examples.join("0001_0001.csv");
        fs::write(&previous, "# previous run\n").unwrap();

        let args = generate_args(root.path(), &["-n", "10"]);
        let result = run(args, Some(1));

        assert!(matches!(
            result,
            Err(CliError::Pipeline(PipelineError::Pairing(_)))
        ));
        let entries: Vec<_> = fs::read_dir(&train_examples).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(fs::read_to_string(&previous).unwrap(), "# previous run\n");
        assert!(!root.path().join("examples/test").exists());
    }

    #[test]
    fn generates_every_selected_split() {
        let root = tempdir().unwrap();
        seed_split(&root.path().join("extracted/train"), 4);
        seed_split(&root.path().join("extracted/test"), 3);

        let args = generate_args(root.path(), &["-n", "2", "--seed", "3"]);
        let outcome = run(args, Some(2)).unwrap();

        assert_eq!(outcome, CommandOutcome::Completed);
        let count = |split: &str| {
            fs::read_dir(root.path().join("examples").join(split))
                .unwrap()
                .count()
        };
        assert_eq!(count("train"), 4 * 3);
        assert_eq!(count("test"), 3 * 3);
    }
}
