//! Decoy sequences for spinning slots
//!
//! Decoys are cosmetic and never influence the result. The final value is
//! always appended as the last element.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

/// Build the value sequence a slot spins through.
///
/// Up to `count` decoys are drawn from `pool`: distinct pool members first,
/// topped up with repetition, then Fisher–Yates shuffled. An empty pool falls
/// back to `fallback` (typically the whole draw result). With nothing to draw
/// from, the sequence is just the final value.
pub fn build_decoy_sequence<R: Rng>(
    final_value: &str,
    pool: &[String],
    fallback: &[String],
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let source = if pool.is_empty() { fallback } else { pool };
    let mut sequence: Vec<String> = Vec::with_capacity(count + 1);

    if !source.is_empty() {
        sequence.extend(source.choose_multiple(rng, count).cloned());
        while sequence.len() < count {
            if let Some(pick) = source.choose(rng) {
                sequence.push(pick.clone());
            }
        }
        sequence.shuffle(rng);
    }

    sequence.push(final_value.to_string());
    sequence
}
