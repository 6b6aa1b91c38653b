use std::fmt;
use thiserror::Error;

/// Number of spatial columns (`x`, `y`, `z`) leading every feature row.
pub const NB_SPATIAL: usize = 3;

/// Names of the canonical feature columns, in order.
///
/// The two categorical columns are signed flags: `+1` when the property holds
/// and `-1` otherwise.
pub const FEATURE_NAMES: [&str; 5] = ["x", "y", "z", "is_hydrophobic", "is_from_protein"];

/// Width of every row produced by the feature encoder.
pub const NB_FEATURES: usize = FEATURE_NAMES.len();

/// Flag value written when a categorical property holds.
pub const FLAG_TRUE: f64 = 1.0;
/// Flag value written when a categorical property does not hold.
pub const FLAG_FALSE: f64 = -1.0;

/// The class of molecule a structure file describes.
///
/// The class is broadcast to every row of the encoded matrix so that, once a
/// protein and a ligand are concatenated into one example, each atom still
/// remembers which partner it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MoleculeClass {
    Protein,
    Ligand,
}

impl MoleculeClass {
    /// Returns the signed flag stored in the `is_from_protein` column.
    pub fn flag(self) -> f64 {
        match self {
            MoleculeClass::Protein => FLAG_TRUE,
            MoleculeClass::Ligand => FLAG_FALSE,
        }
    }

    /// Returns the file-name tag used for extracted matrices (`pro` or `lig`).
    pub fn tag(self) -> &'static str {
        match self {
            MoleculeClass::Protein => "pro",
            MoleculeClass::Ligand => "lig",
        }
    }
}

impl fmt::Display for MoleculeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoleculeClass::Protein => write!(f, "protein"),
            MoleculeClass::Ligand => write!(f, "ligand"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    #[error("Matrix must have at least one column")]
    ZeroColumns,
    #[error("Buffer of length {len} cannot be split into rows of {n_cols} columns")]
    RaggedBuffer { len: usize, n_cols: usize },
    #[error("Cannot concatenate a {left}-column matrix with a {right}-column matrix")]
    ColumnMismatch { left: usize, right: usize },
}

/// A dense, row-major matrix of per-atom features.
///
/// One row per atom, in input order. Matrices are never mutated in place by the
/// pipeline: every stage consumes one and produces a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeMatrix {
    data: Vec<f64>,
    n_cols: usize,
}

impl MoleculeMatrix {
    /// Builds a matrix from a flat row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ZeroColumns`] if `n_cols` is zero, and
    /// [`MatrixError::RaggedBuffer`] if the buffer length is not a multiple of `n_cols`.
    pub fn from_flat(n_cols: usize, data: Vec<f64>) -> Result<Self, MatrixError> {
        if n_cols == 0 {
            return Err(MatrixError::ZeroColumns);
        }
        if data.len() % n_cols != 0 {
            return Err(MatrixError::RaggedBuffer {
                len: data.len(),
                n_cols,
            });
        }
        Ok(Self { data, n_cols })
    }

    /// Builds a matrix from fixed-width rows.
    pub fn from_rows<const N: usize>(rows: &[[f64; N]]) -> Result<Self, MatrixError> {
        Self::from_flat(N, rows.iter().flatten().copied().collect())
    }

    /// Creates a matrix with `n_cols` columns and no rows.
    pub fn empty(n_cols: usize) -> Result<Self, MatrixError> {
        Self::from_flat(n_cols, Vec::new())
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.data.len() / self.n_cols
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns row `index`, or `None` if it is out of range.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.n_cols)?;
        self.data.get(start..start + self.n_cols)
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.n_cols)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Stacks `other` below `self`, producing a new matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ColumnMismatch`] if the two matrices differ in width.
    pub fn concat(&self, other: &MoleculeMatrix) -> Result<MoleculeMatrix, MatrixError> {
        if self.n_cols != other.n_cols {
            return Err(MatrixError::ColumnMismatch {
                left: self.n_cols,
                right: other.n_cols,
            });
        }
        let mut data = Vec::with_capacity(self.data.len() + other.data.len());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&other.data);
        Ok(MoleculeMatrix {
            data,
            n_cols: self.n_cols,
        })
    }
}
