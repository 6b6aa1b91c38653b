use crate::core::models::matrix::{MoleculeMatrix, NB_SPATIAL};
use thiserror::Error;

/// Added to every axis range so the maximum coordinate floors to `R - 1`, never `R`.
pub const RANGE_EPSILON: f64 = 1e-3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoxelError {
    #[error("Grid resolution must be positive")]
    ZeroResolution,
    #[error("Example matrix has {found} columns; at least 3 spatial columns are required")]
    TooFewColumns { found: usize },
}

/// Per-axis coordinate extrema of one example.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    /// Computes the extrema over the spatial columns of `matrix`.
    ///
    /// Returns `None` if the matrix has no rows or fewer than three columns.
    pub fn of(matrix: &MoleculeMatrix) -> Option<Self> {
        if matrix.n_cols() < NB_SPATIAL {
            return None;
        }
        let mut rows = matrix.rows();
        let first = rows.next()?;
        let mut bounds = Self {
            min: [first[0], first[1], first[2]],
            max: [first[0], first[1], first[2]],
        };
        for row in rows {
            for axis in 0..NB_SPATIAL {
                bounds.min[axis] = bounds.min[axis].min(row[axis]);
                bounds.max[axis] = bounds.max[axis].max(row[axis]);
            }
        }
        Some(bounds)
    }

    /// The extent of each axis (`max - min`).
    pub fn extent(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Maps a coordinate on `axis` to a cell index in `0..resolution`.
    ///
    /// `floor((c - min) / (max - min + eps) * R)`. A degenerate axis (`max == min`)
    /// maps every atom to cell 0.
    #[inline]
    pub fn cell_index(&self, axis: usize, coordinate: f64, resolution: usize) -> usize {
        let span = self.max[axis] - self.min[axis] + RANGE_EPSILON;
        let scaled = ((coordinate - self.min[axis]) / span * resolution as f64).floor();
        // Clamped to absorb rounding when the range dwarfs epsilon.
        (scaled.max(0.0) as usize).min(resolution.saturating_sub(1))
    }
}

/// A dense `R x R x R x F` grid of per-cell feature vectors.
///
/// Stored flat in `[x][y][z][f]` order. Cells never written remain zero.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    data: Vec<f32>,
    resolution: usize,
    n_features: usize,
}

impl VoxelGrid {
    /// Creates a zero-initialized grid.
    pub fn new(resolution: usize, n_features: usize) -> Self {
        Self {
            data: vec![0.0; resolution.pow(3) * n_features],
            resolution,
            n_features,
        }
    }

    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// The grid shape as `[R, R, R, F]`.
    pub fn shape(&self) -> [usize; 4] {
        [
            self.resolution,
            self.resolution,
            self.resolution,
            self.n_features,
        ]
    }

    #[inline]
    fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        ((x * self.resolution + y) * self.resolution + z) * self.n_features
    }

    /// The feature vector stored in cell `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= resolution`.
    pub fn cell(&self, x: usize, y: usize, z: usize) -> &[f32] {
        let start = self.offset(x, y, z);
        &self.data[start..start + self.n_features]
    }

    /// Overwrites cell `(x, y, z)` with `features`.
    fn write_cell(&mut self, x: usize, y: usize, z: usize, features: &[f64]) {
        let start = self.offset(x, y, z);
        for (slot, &value) in self.data[start..start + self.n_features]
            .iter_mut()
            .zip(features)
        {
            *slot = value as f32;
        }
    }

    /// Number of cells holding at least one non-zero feature.
    pub fn occupied_cells(&self) -> usize {
        if self.n_features == 0 {
            return 0;
        }
        self.data
            .chunks_exact(self.n_features)
            .filter(|cell| cell.iter().any(|&v| v != 0.0))
            .count()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

/// Rasterizes one example into a `resolution`-sided grid.
///
/// Coordinates are min-max scaled per axis over this example's own atoms, floored to
/// cell indices, and each atom's non-spatial features are written into its cell in
/// row order. When atoms collide the last one written wins; values are never summed.
///
/// # Errors
///
/// Returns [`VoxelError::ZeroResolution`] for a zero resolution and
/// [`VoxelError::TooFewColumns`] when the matrix lacks the three spatial columns.
pub fn voxelize(matrix: &MoleculeMatrix, resolution: usize) -> Result<VoxelGrid, VoxelError> {
    if resolution == 0 {
        return Err(VoxelError::ZeroResolution);
    }
    if matrix.n_cols() < NB_SPATIAL {
        return Err(VoxelError::TooFewColumns {
            found: matrix.n_cols(),
        });
    }

    let mut grid = VoxelGrid::new(resolution, matrix.n_cols() - NB_SPATIAL);
    let Some(bounds) = BoundingBox::of(matrix) else {
        return Ok(grid);
    };

    for row in matrix.rows() {
        let (coords, features) = row.split_at(NB_SPATIAL);
        let x = bounds.cell_index(0, coords[0], resolution);
        let y = bounds.cell_index(1, coords[1], resolution);
        let z = bounds.cell_index(2, coords[2], resolution);
        grid.write_cell(x, y, z, features);
    }
    Ok(grid)
}
