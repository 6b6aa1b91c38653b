use super::CommandOutcome;
use crate::cli::InspectArgs;
use crate::config::{self, InspectConfig};
use crate::error::Result;
use tracing::{info, warn};
use voxbind::workflows::stream::ExampleStream;

/// Occupancy of one voxelized example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleReport {
    pub protein_system: String,
    pub ligand_system: String,
    pub label: bool,
    pub occupied_cells: usize,
    pub total_cells: usize,
}

#[derive(Debug, Default)]
pub struct InspectReport {
    pub examples: Vec<ExampleReport>,
    pub failures: usize,
}

impl InspectReport {
    pub fn positives(&self) -> usize {
        self.examples.iter().filter(|e| e.label).count()
    }
}

pub fn inspect(config: &InspectConfig) -> Result<InspectReport> {
    let mut stream = ExampleStream::open(&config.examples_dir, config.grid_resolution)?;
    if config.positives_only {
        stream = stream.positives_only();
    }
    if let Some(limit) = config.limit {
        stream = stream.limit(limit);
    }
    info!(examples = stream.len(), "Streaming examples through the voxelizer.");

    let mut report = InspectReport::default();
    for item in stream {
        match item {
            Ok(example) => {
                let [r, _, _, _] = example.grid.shape();
                report.examples.push(ExampleReport {
                    occupied_cells: example.grid.occupied_cells(),
                    total_cells: r * r * r,
                    label: example.label,
                    protein_system: example.protein_system,
                    ligand_system: example.ligand_system,
                });
            }
            Err(e) => {
                warn!(error = %e, "Failed to voxelize example.");
                report.failures += 1;
            }
        }
    }
    Ok(report)
}

pub fn run(args: InspectArgs) -> Result<CommandOutcome> {
    let config = config::build_inspect_config(&args)?;
    let report = inspect(&config)?;

    for example in &report.examples {
        println!(
            "{} {} {} {}/{}",
            example.protein_system,
            example.ligand_system,
            if example.label { "positive" } else { "negative" },
            example.occupied_cells,
            example.total_cells
        );
    }
    println!(
        "✓ Inspected {} example(s) ({} positive) at resolution {}.",
        report.examples.len(),
        report.positives(),
        config.grid_resolution
    );

    Ok(CommandOutcome::from_failures(report.failures))
}
