use crate::core::encoding::FeatureEncoder;
use crate::engine::config::{ExtractionConfig, Split, SplitRule};
use crate::engine::error::{FileFailure, PipelineError};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::{
    self,
    extraction::{ExtractedMolecule, resolve_target},
};
use crate::workflows::{list_files, recreate_dir};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

#[derive(Debug, Default)]
pub struct ExtractionSummary {
    pub molecules: Vec<ExtractedMolecule>,
    pub failures: Vec<FileFailure>,
}

impl ExtractionSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Identifiers with at least one molecule extracted into `split`.
    pub fn systems(&self, split: Split) -> BTreeSet<&str> {
        self.molecules
            .iter()
            .filter(|m| m.split == split)
            .map(|m| m.system.as_str())
            .collect()
    }
}

/// Maps every source whose extracted file would also be written by another source
/// to that shared relative path. None of them is extracted, since their outputs
/// would overwrite each other.
fn duplicate_targets<'a>(
    sources: &'a [PathBuf],
    split_rule: &SplitRule,
) -> BTreeMap<&'a Path, PathBuf> {
    let mut by_target: BTreeMap<PathBuf, Vec<&Path>> = BTreeMap::new();
    for source in sources {
        if let Ok(target) = resolve_target(source, split_rule) {
            by_target
                .entry(target.relative_path())
                .or_default()
                .push(source);
        }
    }
    by_target
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .flat_map(|(target, group)| group.into_iter().map(move |s| (s, target.clone())))
        .collect()
}

/// Extracts every file of the raw folder into `train/` and `test/` matrices.
///
/// The extraction root is deleted and recreated first. A file that cannot be named,
/// parsed or written is recorded as a failure and the run continues; an encoding
/// invariant violation aborts the run.
#[instrument(skip_all, name = "extraction_workflow")]
pub fn run(
    config: &ExtractionConfig,
    reporter: &ProgressReporter,
) -> Result<ExtractionSummary, PipelineError> {
    info!(
        source = %config.original_data_folder.display(),
        destination = %config.extracted_data_folder.display(),
        "Starting extraction."
    );
    let sources = list_files(&config.original_data_folder, None)?;

    recreate_dir(&config.extracted_data_folder)?;
    for split in Split::ALL {
        let dir = config.split_folder(split);
        fs::create_dir_all(&dir).map_err(PipelineError::io(&dir))?;
    }

    let duplicates = duplicate_targets(&sources, &config.split_rule);
    if !duplicates.is_empty() {
        warn!(
            files = duplicates.len(),
            "Structure files sharing an extracted name will not be extracted."
        );
    }

    let encoder = FeatureEncoder::new(config.hydrophobic_types.clone());
    reporter.report(Progress::StageStart {
        name: "Extracting",
        total_items: sources.len() as u64,
    });
    let results = tasks::dispatch(&sources, config.worker_count, |source| {
        let result = match duplicates.get(source.as_path()) {
            Some(target) => Err(PipelineError::DuplicateTarget {
                path: source.clone(),
                target: target.clone(),
            }),
            None => tasks::extraction::run(
                source,
                &encoder,
                &config.split_rule,
                &config.extracted_data_folder,
            ),
        };
        let label = source.file_name().map_or_else(
            || source.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        reporter.item_finished(label, &result);
        result
    })?;
    reporter.report(Progress::StageFinish);

    let mut summary = ExtractionSummary::default();
    for (path, result) in sources.into_iter().zip(results) {
        match result {
            Ok(molecule) => summary.molecules.push(molecule),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping structure file.");
                summary.failures.push(FileFailure { path, source: e });
            }
        }
    }

    info!(
        extracted = summary.molecules.len(),
        failed = summary.failures.len(),
        train_systems = summary.systems(Split::Train).len(),
        test_systems = summary.systems(Split::Test).len(),
        "Extraction complete."
    );
    Ok(summary)
}
