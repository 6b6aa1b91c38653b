use crate::core::models::system::{
    MATRIX_EXTENSION, molecule_class_from_file_name, system_id_from_file_name,
};
use crate::engine::config::GenerationConfig;
use crate::engine::error::{PipelineError, TaskFailure};
use crate::engine::pairing::{SystemPlan, plan_examples};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::{self, generation::SystemOutcome};
use crate::workflows::{list_files, recreate_dir};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Default)]
pub struct GenerationSummary {
    /// Size of the identifier universe.
    pub systems: usize,
    pub outcomes: Vec<SystemOutcome>,
    pub failures: Vec<TaskFailure>,
}

impl GenerationSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn positives_written(&self) -> usize {
        self.outcomes
            .iter()
            .flat_map(|o| &o.written)
            .filter(|(pair, _)| pair.is_positive())
            .count()
    }

    pub fn negatives_written(&self) -> usize {
        self.outcomes
            .iter()
            .flat_map(|o| &o.written)
            .filter(|(pair, _)| !pair.is_positive())
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().map(|o| o.skipped.len()).sum()
    }
}

/// Identifiers of every extracted molecule file directly under `dir`.
///
/// Files whose names carry no identifier or molecule tag are ignored.
pub fn collect_universe(dir: &Path) -> Result<BTreeSet<String>, PipelineError> {
    let mut universe = BTreeSet::new();
    for path in list_files(dir, Some(MATRIX_EXTENSION))? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        match (
            system_id_from_file_name(name),
            molecule_class_from_file_name(name),
        ) {
            (Some(system), Some(_)) => {
                universe.insert(system.to_string());
            }
            _ => debug!(file = name, "Ignoring file without system identifier."),
        }
    }
    Ok(universe)
}

/// The validated pairing of one split, computed without touching any output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub universe: BTreeSet<String>,
    pub plans: Vec<SystemPlan>,
}

impl GenerationPlan {
    /// Number of examples the plan will attempt to write.
    pub fn example_count(&self) -> usize {
        self.plans.iter().map(|p| 1 + p.negatives.len()).sum()
    }
}

/// Collects the identifier universe and plans every pair of one split.
///
/// Nothing is written, so callers generating several splits can validate all of
/// them before any examples folder is recreated.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if the extracted folder cannot be listed and
/// [`PipelineError::Pairing`] if the negative count exceeds the universe.
#[instrument(skip_all, name = "generation_pairing")]
pub fn prepare(config: &GenerationConfig) -> Result<GenerationPlan, PipelineError> {
    let universe = collect_universe(&config.extracted_data_folder)?;
    let plans = plan_examples(&universe, config.neg_per_pos, config.seed)?;
    let plan = GenerationPlan { universe, plans };
    info!(
        source = %config.extracted_data_folder.display(),
        systems = plan.universe.len(),
        examples = plan.example_count(),
        "Pairing complete."
    );
    Ok(plan)
}

/// Generates every positive and sampled negative example for one split.
///
/// Pairing is resolved before the examples folder is touched, so an invalid
/// negative count leaves any previous output intact. Each system runs as an
/// isolated task; its failure is recorded in the summary and the others proceed.
pub fn run(
    config: &GenerationConfig,
    reporter: &ProgressReporter,
) -> Result<GenerationSummary, PipelineError> {
    reporter.report(Progress::Message("Pairing systems...".to_string()));
    let plan = prepare(config)?;
    execute(config, &plan, reporter)
}

/// Writes the examples of a plan obtained from [`prepare`] with the same config.
///
/// The examples folder is recreated first.
#[instrument(skip_all, name = "generation_workflow")]
pub fn execute(
    config: &GenerationConfig,
    plan: &GenerationPlan,
    reporter: &ProgressReporter,
) -> Result<GenerationSummary, PipelineError> {
    info!(
        source = %config.extracted_data_folder.display(),
        destination = %config.examples_folder.display(),
        neg_per_pos = %config.neg_per_pos,
        seed = config.seed,
        workers = config.worker_count,
        "Starting example generation."
    );
    let GenerationPlan { universe, plans } = plan;

    recreate_dir(&config.examples_folder)?;

    reporter.report(Progress::StageStart {
        name: "Generating",
        total_items: plans.len() as u64,
    });
    let results = tasks::dispatch(plans, config.worker_count, |plan| {
        let result = tasks::generation::run(
            plan,
            &config.extracted_data_folder,
            &config.examples_folder,
        );
        reporter.item_finished(plan.system.as_str(), &result);
        result
    })?;
    reporter.report(Progress::StageFinish);

    let mut summary = GenerationSummary {
        systems: universe.len(),
        ..Default::default()
    };
    for result in results {
        match result {
            Ok(outcome) => summary.outcomes.push(outcome),
            Err(failure) => {
                warn!(
                    system = %failure.system,
                    error = %failure.source,
                    "System failed; its examples are incomplete."
                );
                summary.failures.push(failure);
            }
        }
    }

    info!(
        positives = summary.positives_written(),
        negatives = summary.negatives_written(),
        skipped = summary.skipped(),
        failed = summary.failures.len(),
        "Example generation complete."
    );
    Ok(summary)
}
