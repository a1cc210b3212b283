//! ES-009: Subsets of a translated batch: random N and shortest N.

use crate::core::types::SequenceRecord;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

pub const DEFAULT_RANDOM_COUNT: usize = 50;
pub const DEFAULT_SHORTEST_COUNT: usize = 100;

/// Load a batch file written by `translate`.
pub fn load_records(path: &Path) -> Result<Vec<SequenceRecord>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("invalid sequence file {}: {}", path.display(), e))
}

/// Pick `min(n, len)` records uniformly without replacement.
/// A seed makes the pick reproducible.
pub fn sample_random(records: &[SequenceRecord], n: usize, seed: Option<u64>) -> Vec<SequenceRecord> {
    let mut rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };
    records.choose_multiple(&mut rng, n).cloned().collect()
}

/// The `n` records with the fewest actions; ties keep input order.
pub fn sample_shortest(records: &[SequenceRecord], n: usize) -> Vec<SequenceRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| r.actions.len());
    sorted.truncate(n);
    sorted
}
