use nalgebra::Point3;

/// A single atom as read from one line of a structure file.
///
/// Records are immutable once parsed. They carry only what the feature encoder
/// needs: the Cartesian position and the categorical atom-type token found at the
/// end of the line.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The atom-type token (e.g., "C", "N", "O1-"), trimmed of surrounding whitespace.
    pub atom_type: String,
}

impl AtomRecord {
    /// Creates a new `AtomRecord`.
    ///
    /// # Arguments
    ///
    /// * `position` - The 3D coordinates of the atom.
    /// * `atom_type` - The categorical atom-type token.
    pub fn new(position: Point3<f64>, atom_type: &str) -> Self {
        Self {
            position,
            atom_type: atom_type.to_string(),
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.position.z
    }
}
