mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::commands::CommandOutcome;
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info, warn};

fn main() {
    match run_app() {
        Ok(CommandOutcome::Completed) => {}
        Ok(CommandOutcome::CompletedWithFailures(_)) => std::process::exit(1),
        Err(e) => {
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_app() -> Result<CommandOutcome> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("🚀 voxbind CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let threads = cli.threads;
    let command_result = match cli.command {
        Commands::Extract(args) => {
            info!("Dispatching to 'extract' command.");
            commands::extract::run(args, threads)
        }
        Commands::Generate(args) => {
            info!("Dispatching to 'generate' command.");
            commands::generate::run(args, threads)
        }
        Commands::Inspect(args) => {
            info!("Dispatching to 'inspect' command.");
            commands::inspect::run(args)
        }
    };

    match &command_result {
        Ok(CommandOutcome::Completed) => {
            info!("✅ Command completed successfully.");
            println!("✅ Command completed successfully.");
        }
        Ok(CommandOutcome::CompletedWithFailures(count)) => {
            warn!("Command completed with {} failure(s).", count);
            eprintln!("⚠️  Command completed with {} failure(s).", count);
        }
        Err(e) => {
            error!("❌ Command failed: {}", e);
            eprintln!("❌ Command failed: {}", e);
        }
    }

    command_result
}
