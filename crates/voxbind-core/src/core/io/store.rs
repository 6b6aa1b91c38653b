use crate::core::io::matrix::{self, MatrixIoError};
use crate::core::models::matrix::{FEATURE_NAMES, MoleculeClass, MoleculeMatrix};
use crate::core::models::system::{ExamplePair, extracted_file_name};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// A protein matrix paired with a ligand matrix, not yet concatenated.
#[derive(Debug, Clone, Copy)]
pub struct Example<'a> {
    pub pair: &'a ExamplePair,
    pub protein: &'a MoleculeMatrix,
    pub ligand: &'a MoleculeMatrix,
}

impl<'a> Example<'a> {
    pub fn new(
        pair: &'a ExamplePair,
        protein: &'a MoleculeMatrix,
        ligand: &'a MoleculeMatrix,
    ) -> Self {
        Self {
            pair,
            protein,
            ligand,
        }
    }

    /// Checks that both molecules have atoms and share the same column count.
    pub fn validate(&self) -> Result<(), DegenerateExample> {
        if self.protein.is_empty() {
            return Err(DegenerateExample::EmptyMolecule {
                system: self.pair.protein_system.clone(),
                class: MoleculeClass::Protein,
            });
        }
        if self.ligand.is_empty() {
            return Err(DegenerateExample::EmptyMolecule {
                system: self.pair.ligand_system.clone(),
                class: MoleculeClass::Ligand,
            });
        }
        if self.protein.n_cols() != self.ligand.n_cols() {
            return Err(DegenerateExample::ColumnMismatch {
                protein: self.protein.n_cols(),
                ligand: self.ligand.n_cols(),
            });
        }
        Ok(())
    }

    /// Stacks the ligand rows below the protein rows.
    pub fn concatenated(&self) -> Result<MoleculeMatrix, DegenerateExample> {
        self.validate()?;
        self.protein
            .concat(self.ligand)
            .map_err(|_| DegenerateExample::ColumnMismatch {
                protein: self.protein.n_cols(),
                ligand: self.ligand.n_cols(),
            })
    }

    /// Comment lines written above the matrix body.
    pub fn header_lines(&self) -> Vec<String> {
        let polarity = if self.pair.is_positive() {
            "Positive"
        } else {
            "Negative"
        };
        vec![
            format!("{} example of (Protein, Ligand) : {}", polarity, self.pair),
            format!(" - Number of atoms in Protein: {}", self.protein.n_rows()),
            format!(" - Number of atoms in Ligand : {}", self.ligand.n_rows()),
            column_names(self.protein.n_cols()),
        ]
    }
}

/// A pairing that cannot be persisted. Not an error: the store logs and skips it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DegenerateExample {
    #[error("{class} of system '{system}' has no atoms")]
    EmptyMolecule { system: String, class: MoleculeClass },
    #[error("protein has {protein} feature columns but ligand has {ligand}")]
    ColumnMismatch { protein: usize, ligand: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Written(PathBuf),
    Skipped(DegenerateExample),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access matrix file '{path}': {source}", path = path.display())]
    Matrix {
        path: PathBuf,
        #[source]
        source: MatrixIoError,
    },
}

impl StoreError {
    pub fn path(&self) -> &Path {
        match self {
            StoreError::Matrix { path, .. } => path,
        }
    }
}

/// Comma-joined column names; canonical names when the width matches.
pub fn column_names(n_cols: usize) -> String {
    if n_cols == FEATURE_NAMES.len() {
        FEATURE_NAMES.join(",")
    } else {
        (0..n_cols)
            .map(|i| format!("c{}", i))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Persists `example` under `dest_dir` as `{protein}_{ligand}.csv`.
///
/// Degenerate examples (an empty molecule, or mismatched column counts) are logged
/// and skipped without touching the filesystem.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be written.
pub fn save_example(dest_dir: &Path, example: &Example<'_>) -> Result<SaveOutcome, StoreError> {
    let concatenated = match example.concatenated() {
        Ok(matrix) => matrix,
        Err(reason) => {
            warn!(pair = %example.pair, %reason, "Skipping degenerate example.");
            return Ok(SaveOutcome::Skipped(reason));
        }
    };

    let path = dest_dir.join(example.pair.file_name());
    matrix::write_matrix_to_path(&path, &concatenated, &example.header_lines()).map_err(
        |source| StoreError::Matrix {
            path: path.clone(),
            source,
        },
    )?;
    debug!(pair = %example.pair, path = %path.display(), "Example written.");
    Ok(SaveOutcome::Written(path))
}

/// Loads the concatenated matrix of a persisted example, skipping its header.
pub fn load_example(path: &Path) -> Result<MoleculeMatrix, StoreError> {
    matrix::read_matrix_from_path(path).map_err(|source| StoreError::Matrix {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes one extracted molecule to `dir` as `{system}_{pro|lig}_cg.csv`, without header.
pub fn save_molecule(
    dir: &Path,
    system: &str,
    class: MoleculeClass,
    matrix: &MoleculeMatrix,
) -> Result<PathBuf, StoreError> {
    let path = dir.join(extracted_file_name(system, class));
    matrix::write_matrix_to_path(&path, matrix, &[]).map_err(|source| StoreError::Matrix {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Loads the extracted molecule written by [`save_molecule`].
pub fn load_molecule(
    dir: &Path,
    system: &str,
    class: MoleculeClass,
) -> Result<MoleculeMatrix, StoreError> {
    load_example(&dir.join(extracted_file_name(system, class)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn protein() -> MoleculeMatrix {
        MoleculeMatrix::from_rows(&[
            [1.0, 2.0, 3.0, 1.0, 1.0],
            [4.0, 5.0, 6.0, -1.0, 1.0],
        ])
        .unwrap()
    }

    fn ligand() -> MoleculeMatrix {
        MoleculeMatrix::from_rows(&[[-0.5, 0.25, 9.125, 1.0, -1.0]]).unwrap()
    }

    #[test]
    fn save_then_load_reconstructs_concatenation() {
        let dir = tempdir().unwrap();
        let pair = ExamplePair::new("0001", "0002");
        let (protein, ligand) = (protein(), ligand());
        let example = Example::new(&pair, &protein, &ligand);

        let outcome = save_example(dir.path(), &example).unwrap();
        let path = dir.path().join("0001_0002.csv");
        assert_eq!(outcome, SaveOutcome::Written(path.clone()));

        let loaded = load_example(&path).unwrap();
        assert_eq!(loaded, protein.concat(&ligand).unwrap());
    }

    #[test]
    fn header_describes_pair_counts_and_columns() {
        let dir = tempdir().unwrap();
        let pair = ExamplePair::positive("0003");
        let (protein, ligand) = (protein(), ligand());
        save_example(dir.path(), &Example::new(&pair, &protein, &ligand)).unwrap();

        let content = fs::read_to_string(dir.path().join("0003_0003.csv")).unwrap();
        let header: Vec<&str> = content.lines().take(4).collect();
        assert_eq!(
            header,
            vec![
                "# Positive example of (Protein, Ligand) : (0003,0003)",
                "#  - Number of atoms in Protein: 2",
                "#  - Number of atoms in Ligand : 1",
                "# x,y,z,is_hydrophobic,is_from_protein",
            ]
        );
        assert_eq!(content.lines().count(), 4 + 3);
    }

    #[test]
    fn negative_pair_is_labeled_negative() {
        let pair = ExamplePair::new("0001", "0002");
        let (protein, ligand) = (protein(), ligand());
        let header = Example::new(&pair, &protein, &ligand).header_lines();
        assert!(header[0].starts_with("Negative example"));
    }

    #[test]
    fn empty_molecule_is_skipped_without_writing() {
        let dir = tempdir().unwrap();
        let pair = ExamplePair::positive("0004");
        let protein = protein();
        let empty = MoleculeMatrix::empty(5).unwrap();

        let outcome = save_example(dir.path(), &Example::new(&pair, &protein, &empty)).unwrap();

        assert_eq!(
            outcome,
            SaveOutcome::Skipped(DegenerateExample::EmptyMolecule {
                system: "0004".to_string(),
                class: MoleculeClass::Ligand,
            })
        );
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn column_mismatch_is_skipped_without_writing() {
        let dir = tempdir().unwrap();
        let pair = ExamplePair::new("0001", "0005");
        let protein = protein();
        let narrow = MoleculeMatrix::from_rows(&[[0.0, 0.0, 0.0]]).unwrap();

        let outcome = save_example(dir.path(), &Example::new(&pair, &protein, &narrow)).unwrap();

        assert_eq!(
            outcome,
            SaveOutcome::Skipped(DegenerateExample::ColumnMismatch {
                protein: 5,
                ligand: 3
            })
        );
        assert!(!dir.path().join("0001_0005.csv").exists());
    }

    #[test]
    fn save_into_missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let pair = ExamplePair::positive("0001");
        let (protein, ligand) = (protein(), ligand());

        let err = save_example(&missing, &Example::new(&pair, &protein, &ligand)).unwrap_err();
        assert_eq!(err.path(), missing.join("0001_0001.csv"));
    }

    #[test]
    fn molecules_round_trip_under_extracted_names() {
        let dir = tempdir().unwrap();
        let path = save_molecule(dir.path(), "0007", MoleculeClass::Ligand, &ligand()).unwrap();
        assert_eq!(path, dir.path().join("0007_lig_cg.csv"));
        assert!(!fs::read_to_string(&path).unwrap().starts_with('#'));

        let loaded = load_molecule(dir.path(), "0007", MoleculeClass::Ligand).unwrap();
        assert_eq!(loaded, ligand());
        assert!(load_molecule(dir.path(), "0007", MoleculeClass::Protein).is_err());
    }

    #[test]
    fn column_names_fall_back_for_non_canonical_widths() {
        assert_eq!(column_names(5), "x,y,z,is_hydrophobic,is_from_protein");
        assert_eq!(column_names(3), "c0,c1,c2");
    }
}
