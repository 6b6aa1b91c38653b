use crate::core::models::atom::AtomRecord;
use crate::core::models::matrix::{
    FLAG_FALSE, FLAG_TRUE, MoleculeClass, MoleculeMatrix, NB_FEATURES,
};
use serde::Deserialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// Atom-type tokens treated as hydrophobic when no vocabulary is configured.
pub const DEFAULT_HYDROPHOBIC_TYPES: &[&str] = &["C"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Encoded matrix has {found} columns, expected {expected}")]
    EncodingInvariantViolation { expected: usize, found: usize },
}

/// The configured vocabulary of hydrophobic atom-type tokens.
///
/// Membership is an exact, case-sensitive match on the trimmed token. Anything
/// outside the set is considered polar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct HydrophobicTypes(BTreeSet<String>);

impl HydrophobicTypes {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(types.into_iter().map(Into::into).collect())
    }

    #[inline]
    pub fn contains(&self, atom_type: &str) -> bool {
        self.0.contains(atom_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for HydrophobicTypes {
    fn default() -> Self {
        Self::new(DEFAULT_HYDROPHOBIC_TYPES.iter().copied())
    }
}

/// Converts parsed atoms into the canonical feature matrix.
///
/// Each atom becomes one row `[x, y, z, is_hydrophobic, is_from_protein]`, where the
/// last two columns are signed flags. The molecule class is broadcast to every row.
#[derive(Debug, Clone, Default)]
pub struct FeatureEncoder {
    hydrophobic_types: HydrophobicTypes,
}

impl FeatureEncoder {
    pub fn new(hydrophobic_types: HydrophobicTypes) -> Self {
        Self { hydrophobic_types }
    }

    pub fn hydrophobic_types(&self) -> &HydrophobicTypes {
        &self.hydrophobic_types
    }

    /// Encodes `atoms` in order, one row per atom.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::EncodingInvariantViolation`] if the produced matrix does
    /// not have exactly [`NB_FEATURES`] columns. This indicates a programming error and
    /// must not be retried.
    pub fn encode(
        &self,
        atoms: &[AtomRecord],
        class: MoleculeClass,
    ) -> Result<MoleculeMatrix, EncodingError> {
        let class_flag = class.flag();
        let data: Vec<f64> = atoms
            .iter()
            .flat_map(|atom| self.encode_atom(atom, class_flag))
            .collect();

        let found = data.len().checked_div(atoms.len()).unwrap_or(NB_FEATURES);
        if found != NB_FEATURES || found * atoms.len() != data.len() {
            return Err(EncodingError::EncodingInvariantViolation {
                expected: NB_FEATURES,
                found,
            });
        }
        MoleculeMatrix::from_flat(NB_FEATURES, data).map_err(|_| {
            EncodingError::EncodingInvariantViolation {
                expected: NB_FEATURES,
                found,
            }
        })
    }

    fn encode_atom(&self, atom: &AtomRecord, class_flag: f64) -> [f64; NB_FEATURES] {
        let hydrophobic_flag = if self.hydrophobic_types.contains(&atom.atom_type) {
            FLAG_TRUE
        } else {
            FLAG_FALSE
        };
        [atom.x(), atom.y(), atom.z(), hydrophobic_flag, class_flag]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn atoms() -> Vec<AtomRecord> {
        vec![
            AtomRecord::new(Point3::new(1.0, 2.0, 3.0), "C"),
            AtomRecord::new(Point3::new(-1.5, 0.0, 4.25), "N"),
            AtomRecord::new(Point3::new(0.0, 0.0, 0.0), "O1-"),
        ]
    }

    #[test]
    fn encode_produces_one_row_per_atom_with_fixed_width() {
        let encoder = FeatureEncoder::default();
        let matrix = encoder.encode(&atoms(), MoleculeClass::Protein).unwrap();

        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.n_cols(), NB_FEATURES);
        assert!(matrix.rows().all(|row| row.len() == NB_FEATURES));
    }

    #[test]
    fn encode_preserves_order_and_coordinates() {
        let matrix = FeatureEncoder::default()
            .encode(&atoms(), MoleculeClass::Ligand)
            .unwrap();

        assert_eq!(matrix.row(0), Some(&[1.0, 2.0, 3.0, 1.0, -1.0][..]));
        assert_eq!(matrix.row(1), Some(&[-1.5, 0.0, 4.25, -1.0, -1.0][..]));
        assert_eq!(matrix.row(2), Some(&[0.0, 0.0, 0.0, -1.0, -1.0][..]));
    }

    #[test]
    fn molecule_class_is_broadcast_to_every_row() {
        let matrix = FeatureEncoder::default()
            .encode(&atoms(), MoleculeClass::Protein)
            .unwrap();
        assert!(matrix.rows().all(|row| row[4] == 1.0));
    }

    #[test]
    fn hydrophobic_vocabulary_is_injected() {
        let encoder = FeatureEncoder::new(HydrophobicTypes::new(["N", "O1-"]));
        let matrix = encoder.encode(&atoms(), MoleculeClass::Protein).unwrap();
        let flags: Vec<f64> = matrix.rows().map(|row| row[3]).collect();
        assert_eq!(flags, vec![-1.0, 1.0, 1.0]);
    }

    #[test]
    fn empty_input_yields_empty_matrix() {
        let matrix = FeatureEncoder::default()
            .encode(&[], MoleculeClass::Ligand)
            .unwrap();
        assert!(matrix.is_empty());
        assert_eq!(matrix.n_cols(), NB_FEATURES);
    }
}
