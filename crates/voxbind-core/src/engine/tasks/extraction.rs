use crate::core::encoding::FeatureEncoder;
use crate::core::io::store;
use crate::core::io::structure::FixedColumnFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::matrix::MoleculeClass;
use crate::core::models::system::{
    extracted_file_name, molecule_class_from_file_name, system_id_from_file_name,
};
use crate::engine::config::{Split, SplitRule};
use crate::engine::error::PipelineError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One raw structure file after parsing, encoding and persisting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMolecule {
    pub system: String,
    pub class: MoleculeClass,
    pub split: Split,
    pub atoms: usize,
    pub path: PathBuf,
}

fn malformed(path: &Path, reason: &'static str) -> PipelineError {
    PipelineError::MalformedFileName {
        path: path.to_path_buf(),
        reason,
    }
}

/// Where one raw structure file will be written, derived from its name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionTarget<'a> {
    pub system: &'a str,
    pub class: MoleculeClass,
    pub split: Split,
}

impl ExtractionTarget<'_> {
    /// Path of the extracted matrix relative to the extraction root.
    pub fn relative_path(&self) -> PathBuf {
        Path::new(self.split.dir_name()).join(extracted_file_name(self.system, self.class))
    }
}

/// Resolves the destination of `source` from its `{id}_{pro|lig}...` name.
///
/// `id` must carry a leading numeric index for the split rule.
pub fn resolve_target<'a>(
    source: &'a Path,
    split_rule: &SplitRule,
) -> Result<ExtractionTarget<'a>, PipelineError> {
    let file_name = source
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| malformed(source, "not valid UTF-8"))?;
    let system = system_id_from_file_name(file_name)
        .ok_or_else(|| malformed(source, "missing '{id}_' prefix"))?;
    let class = molecule_class_from_file_name(file_name)
        .ok_or_else(|| malformed(source, "missing 'pro' or 'lig' tag"))?;
    let split = split_rule
        .assign(system)
        .ok_or_else(|| malformed(source, "system identifier has no leading index"))?;
    Ok(ExtractionTarget {
        system,
        class,
        split,
    })
}

/// Extracts one structure file into `extracted_root/{train|test}/`.
pub fn run(
    source: &Path,
    encoder: &FeatureEncoder,
    split_rule: &SplitRule,
    extracted_root: &Path,
) -> Result<ExtractedMolecule, PipelineError> {
    let ExtractionTarget {
        system,
        class,
        split,
    } = resolve_target(source, split_rule)?;

    let atoms =
        FixedColumnFile::read_from_path(source).map_err(|e| PipelineError::Structure {
            path: source.to_path_buf(),
            source: e,
        })?;
    let matrix = encoder
        .encode(&atoms, class)
        .map_err(|e| PipelineError::Encoding {
            path: source.to_path_buf(),
            source: e,
        })?;

    let path = store::save_molecule(
        &extracted_root.join(split.dir_name()),
        system,
        class,
        &matrix,
    )?;
    debug!(
        system,
        %class,
        %split,
        atoms = atoms.len(),
        "Extracted structure file."
    );

    Ok(ExtractedMolecule {
        system: system.to_string(),
        class,
        split,
        atoms: atoms.len(),
        path,
    })
}
