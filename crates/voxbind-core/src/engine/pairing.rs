use crate::core::models::system::ExamplePair;
use crate::engine::config::NegativeCount;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PairingError {
    #[error(
        "Requested {requested} negatives per positive, but a universe of {universe} systems allows at most {max}"
    )]
    RequestedSampleExceedsUniverse {
        requested: usize,
        universe: usize,
        max: usize,
    },
}

/// Every example to generate for one system: its positive pairing and the ligands
/// drawn for its negatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPlan {
    pub system: String,
    /// Ligand systems paired with this protein, in sampling order. Never contains
    /// `system` itself and holds no duplicates.
    pub negatives: Vec<String>,
}

impl SystemPlan {
    pub fn positive(&self) -> ExamplePair {
        ExamplePair::positive(self.system.as_str())
    }

    pub fn negative_pairs(&self) -> impl Iterator<Item = ExamplePair> + '_ {
        self.negatives
            .iter()
            .map(|ligand| ExamplePair::new(self.system.as_str(), ligand.as_str()))
    }

    /// The positive pair followed by the negatives.
    pub fn pairs(&self) -> impl Iterator<Item = ExamplePair> + '_ {
        std::iter::once(self.positive()).chain(self.negative_pairs())
    }
}

/// Plans the examples for every system of `universe`.
///
/// Identifiers are deduplicated and visited in sorted order, which is also the order
/// of the returned plans. A single generator seeded with `seed` draws each system's
/// negatives without replacement from the other identifiers, so the result depends
/// only on the identifier set, `neg_per_pos` and `seed`.
///
/// # Errors
///
/// Returns [`PairingError::RequestedSampleExceedsUniverse`] if `neg_per_pos` asks for
/// more negatives than there are other systems.
pub fn plan_examples<I, S>(
    universe: I,
    neg_per_pos: NegativeCount,
    seed: u64,
) -> Result<Vec<SystemPlan>, PairingError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let universe: BTreeSet<String> = universe
        .into_iter()
        .map(|id| id.as_ref().to_string())
        .collect();
    let sample_size = neg_per_pos.resolve(universe.len())?;
    debug!(
        systems = universe.len(),
        negatives_per_positive = sample_size,
        seed,
        "Planning example pairs."
    );

    let sorted: Vec<&str> = universe.iter().map(String::as_str).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    Ok(sorted
        .iter()
        .map(|&system| {
            let mut candidates: Vec<&str> =
                sorted.iter().copied().filter(|&other| other != system).collect();
            candidates.shuffle(&mut rng);
            candidates.truncate(sample_size);
            SystemPlan {
                system: system.to_string(),
                negatives: candidates.into_iter().map(str::to_string).collect(),
            }
        })
        .collect())
}

/// The flattened pairing sequence: for each system in sorted order, its positive
/// pair followed by its negatives.
pub fn pair_examples<I, S>(
    universe: I,
    neg_per_pos: NegativeCount,
    seed: u64,
) -> Result<Vec<ExamplePair>, PairingError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(plan_examples(universe, neg_per_pos, seed)?
        .iter()
        .flat_map(SystemPlan::pairs)
        .collect())
}
