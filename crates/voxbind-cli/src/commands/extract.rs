use super::CommandOutcome;
use crate::cli::ExtractArgs;
use crate::config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use tracing::info;
use voxbind::engine::config::Split;
use voxbind::engine::progress::ProgressReporter;
use voxbind::workflows;

pub fn run(args: ExtractArgs, threads: Option<usize>) -> Result<CommandOutcome> {
    info!("Merging configuration from file and CLI arguments...");
    let config = config::build_extraction_config(&args, threads)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Extracting structures from {} into {}...",
        config.original_data_folder.display(),
        config.extracted_data_folder.display()
    );
    let summary = workflows::extract::run(&config, &reporter)?;

    println!(
        "✓ Extracted {} molecule(s): {} training system(s), {} test system(s).",
        summary.molecules.len(),
        summary.systems(Split::Train).len(),
        summary.systems(Split::Test).len()
    );
    for failure in &summary.failures {
        eprintln!("  ✗ {}", failure);
    }

    Ok(CommandOutcome::from_failures(summary.failures.len()))
}
