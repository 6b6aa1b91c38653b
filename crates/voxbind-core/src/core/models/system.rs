use super::matrix::MoleculeClass;
use std::fmt;

/// Extension of every persisted matrix and example file.
pub const MATRIX_EXTENSION: &str = "csv";

/// Suffix shared by extracted molecule files after the class tag (`{id}_pro_cg.csv`).
const EXTRACTED_SUFFIX: &str = "cg";

/// Returns the system identifier encoded in a file name.
///
/// The identifier is everything before the first `_` (e.g. `"0001"` for
/// `"0001_pro_cg.pdb"`). Returns `None` when the prefix is empty or the name
/// contains no `_`.
pub fn system_id_from_file_name(file_name: &str) -> Option<&str> {
    let (id, _) = file_name.split_once('_')?;
    (!id.is_empty()).then_some(id)
}

/// Infers the molecule class from the tags following the identifier.
///
/// `"0001_pro_cg.pdb"` is a protein, `"0001_lig_cg.pdb"` a ligand. Any other
/// naming yields `None`.
pub fn molecule_class_from_file_name(file_name: &str) -> Option<MoleculeClass> {
    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem);
    let (_, tags) = stem.split_once('_')?;
    tags.split('_').find_map(|tag| match tag {
        "pro" => Some(MoleculeClass::Protein),
        "lig" => Some(MoleculeClass::Ligand),
        _ => None,
    })
}

/// File name of an extracted molecule matrix.
pub fn extracted_file_name(system: &str, class: MoleculeClass) -> String {
    format!(
        "{}_{}_{}.{}",
        system,
        class.tag(),
        EXTRACTED_SUFFIX,
        MATRIX_EXTENSION
    )
}

/// Parses the leading decimal digits of an identifier (`"0042abc"` -> `42`).
pub fn leading_index(system: &str) -> Option<u64> {
    let end = system
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(system.len());
    system[..end].parse().ok()
}

/// A (protein system, ligand system) pairing.
///
/// The label is never stored: an example is positive exactly when both
/// identifiers are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExamplePair {
    pub protein_system: String,
    pub ligand_system: String,
}

impl ExamplePair {
    pub fn new(protein_system: impl Into<String>, ligand_system: impl Into<String>) -> Self {
        Self {
            protein_system: protein_system.into(),
            ligand_system: ligand_system.into(),
        }
    }

    /// The positive pairing of a system with its own cognate ligand.
    pub fn positive(system: impl Into<String>) -> Self {
        let system = system.into();
        Self {
            protein_system: system.clone(),
            ligand_system: system,
        }
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.protein_system == self.ligand_system
    }

    /// File name of the persisted example: `{protein}_{ligand}.csv`.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.{}",
            self.protein_system, self.ligand_system, MATRIX_EXTENSION
        )
    }

    /// Recovers the pair from a persisted example's file name.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(MATRIX_EXTENSION)?.strip_suffix('.')?;
        let (protein, ligand) = stem.split_once('_')?;
        if protein.is_empty() || ligand.is_empty() || ligand.contains('_') {
            return None;
        }
        Some(Self::new(protein, ligand))
    }
}

impl fmt::Display for ExamplePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.protein_system, self.ligand_system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_id_is_prefix_before_first_underscore() {
        assert_eq!(system_id_from_file_name("0001_pro_cg.pdb"), Some("0001"));
        assert_eq!(system_id_from_file_name("0001_lig_cg.csv"), Some("0001"));
        assert_eq!(system_id_from_file_name("_pro_cg.pdb"), None);
        assert_eq!(system_id_from_file_name("README"), None);
    }

    #[test]
    fn molecule_class_is_read_from_tags() {
        assert_eq!(
            molecule_class_from_file_name("0001_pro_cg.pdb"),
            Some(MoleculeClass::Protein)
        );
        assert_eq!(
            molecule_class_from_file_name("0001_lig_cg.pdb"),
            Some(MoleculeClass::Ligand)
        );
        assert_eq!(molecule_class_from_file_name("0001_water.pdb"), None);
        assert_eq!(molecule_class_from_file_name("0001.pdb"), None);
    }

    #[test]
    fn extracted_file_name_round_trips_through_parsers() {
        let name = extracted_file_name("0007", MoleculeClass::Ligand);
        assert_eq!(name, "0007_lig_cg.csv");
        assert_eq!(system_id_from_file_name(&name), Some("0007"));
        assert_eq!(
            molecule_class_from_file_name(&name),
            Some(MoleculeClass::Ligand)
        );
    }

    #[test]
    fn leading_index_parses_digit_prefix() {
        assert_eq!(leading_index("0042"), Some(42));
        assert_eq!(leading_index("2700b"), Some(2700));
        assert_eq!(leading_index("abc"), None);
        assert_eq!(leading_index(""), None);
    }

    #[test]
    fn example_pair_label_follows_identifiers() {
        assert!(ExamplePair::positive("0001").is_positive());
        assert!(!ExamplePair::new("0001", "0002").is_positive());
    }

    #[test]
    fn example_pair_file_name_is_reversible() {
        let pair = ExamplePair::new("0001", "0002");
        assert_eq!(pair.file_name(), "0001_0002.csv");
        assert_eq!(ExamplePair::from_file_name("0001_0002.csv"), Some(pair));
        assert_eq!(ExamplePair::from_file_name("0001_0002.txt"), None);
        assert_eq!(ExamplePair::from_file_name("0001.csv"), None);
        assert_eq!(ExamplePair::from_file_name("0001_pro_cg.csv"), None);
    }
}
