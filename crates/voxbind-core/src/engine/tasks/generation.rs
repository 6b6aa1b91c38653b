use crate::core::io::store::{self, DegenerateExample, Example, SaveOutcome};
use crate::core::models::matrix::MoleculeClass;
use crate::core::models::system::ExamplePair;
use crate::engine::error::{PipelineError, TaskFailure};
use crate::engine::pairing::SystemPlan;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What one system's task produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemOutcome {
    pub system: String,
    pub written: Vec<(ExamplePair, PathBuf)>,
    pub skipped: Vec<(ExamplePair, DegenerateExample)>,
}

impl SystemOutcome {
    fn new(system: &str) -> Self {
        Self {
            system: system.to_string(),
            written: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn record(&mut self, pair: ExamplePair, outcome: SaveOutcome) {
        match outcome {
            SaveOutcome::Written(path) => self.written.push((pair, path)),
            SaveOutcome::Skipped(reason) => self.skipped.push((pair, reason)),
        }
    }
}

/// Generates the positive example of `plan.system` and then each planned negative.
///
/// If the positive cannot be written the negatives are not attempted. Degenerate
/// examples are recorded as skipped, not as failures.
pub fn run(
    plan: &SystemPlan,
    extracted_dir: &Path,
    examples_dir: &Path,
) -> Result<SystemOutcome, TaskFailure> {
    generate(plan, extracted_dir, examples_dir)
        .map_err(|source| TaskFailure::new(plan.system.as_str(), source))
}

fn generate(
    plan: &SystemPlan,
    extracted_dir: &Path,
    examples_dir: &Path,
) -> Result<SystemOutcome, PipelineError> {
    let protein = store::load_molecule(extracted_dir, &plan.system, MoleculeClass::Protein)?;
    let ligand = store::load_molecule(extracted_dir, &plan.system, MoleculeClass::Ligand)?;

    let mut outcome = SystemOutcome::new(&plan.system);
    let positive = plan.positive();
    let saved = store::save_example(examples_dir, &Example::new(&positive, &protein, &ligand))?;
    outcome.record(positive, saved);

    for pair in plan.negative_pairs() {
        let decoy = store::load_molecule(extracted_dir, &pair.ligand_system, MoleculeClass::Ligand)?;
        let saved = store::save_example(examples_dir, &Example::new(&pair, &protein, &decoy))?;
        outcome.record(pair, saved);
    }

    debug!(
        system = %plan.system,
        written = outcome.written.len(),
        skipped = outcome.skipped.len(),
        "System examples generated."
    );
    Ok(outcome)
}
