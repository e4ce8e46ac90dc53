//! Draw Engine: core sampling logic

use std::collections::HashMap;

use rand::prelude::*;

use crate::config::{DrawConfig, DrawResult, PoolSource, range_len, range_value};

/// Mutable pool consumed by one draw.
///
/// Removal is swap-remove: the picked slot takes the last candidate. Numeric
/// ranges are never materialized; displaced offsets live in a sparse map, so
/// a range pool behaves exactly like the equivalent materialized list.
enum WorkingPool<'a> {
    Items(Vec<&'a str>),
    Range {
        min: i64,
        len: u64,
        displaced: HashMap<u64, u64>,
    },
}

impl<'a> WorkingPool<'a> {
    fn from_source(source: &'a PoolSource) -> Self {
        match source {
            PoolSource::List { items } => Self::Items(items.iter().map(String::as_str).collect()),
            PoolSource::NumericRange { min, max } => Self::Range {
                min: *min,
                len: range_len(*min, *max),
                displaced: HashMap::new(),
            },
        }
    }

    fn len(&self) -> u64 {
        match self {
            Self::Items(items) => items.len() as u64,
            Self::Range { len, .. } => *len,
        }
    }

    fn get(&self, index: u64) -> String {
        match self {
            Self::Items(items) => items[index as usize].to_string(),
            Self::Range { min, displaced, .. } => {
                let offset = displaced.get(&index).copied().unwrap_or(index);
                range_value(*min, offset).to_string()
            }
        }
    }

    fn swap_remove(&mut self, index: u64) -> String {
        match self {
            Self::Items(items) => items.swap_remove(index as usize).to_string(),
            Self::Range {
                min,
                len,
                displaced,
            } => {
                let last = *len - 1;
                let picked = displaced.remove(&index).unwrap_or(index);
                if index != last {
                    let tail = displaced.remove(&last).unwrap_or(last);
                    displaced.insert(index, tail);
                }
                *len = last;
                range_value(*min, picked).to_string()
            }
        }
    }
}

/// Run one draw.
///
/// Total: empty pools, zero winners and inverted ranges yield an empty result.
/// Draws stop early when the working pool empties.
pub fn run_draw<R: Rng>(config: &DrawConfig, rng: &mut R) -> DrawResult {
    let target = config.effective_count();
    let mut pool = WorkingPool::from_source(&config.source);
    let mut winners = Vec::with_capacity(target.min(4096) as usize);

    for _ in 0..target {
        let len = pool.len();
        if len == 0 {
            break;
        }
        let index = rng.random_range(0..len);
        let picked = if config.allow_repetition {
            pool.get(index)
        } else {
            pool.swap_remove(index)
        };
        winners.push(picked);
    }

    log::debug!(
        "draw: kind={:?} pool={} requested={} drawn={} repetition={} rank_all={}",
        config.source_kind(),
        config.pool_size(),
        target,
        winners.len(),
        config.allow_repetition,
        config.rank_all
    );

    DrawResult::new(winners)
}

/// Draw Engine
///
/// Owns the random source for a session. Production engines seed from the OS;
/// tests seed explicitly for reproducible results.
pub struct DrawEngine {
    /// Random number generator
    rng: StdRng,
    /// Draws performed
    draw_count: u64,
}

impl DrawEngine {
    /// Engine seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            draw_count: 0,
        }
    }

    /// Engine with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            draw_count: 0,
        }
    }

    /// Reseed RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Execute a draw
    pub fn draw(&mut self, config: &DrawConfig) -> DrawResult {
        self.draw_count += 1;
        run_draw(config, &mut self.rng)
    }

    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }
}

impl Default for DrawEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("item-{i}")).collect()
    }

    #[test]
    fn test_without_repetition_never_repeats() {
        let items = names(20);
        let config = DrawConfig::new(PoolSource::list(items.clone())).with_winners(12);

        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let result = run_draw(&config, &mut rng);
            assert_eq!(result.len(), 12);
            let unique: HashSet<_> = result.iter().collect();
            assert_eq!(unique.len(), 12);
            assert!(result.iter().all(|w| items.contains(w)));
        }
    }

    #[test]
    fn test_rank_all_is_permutation() {
        let items = names(9);
        let config = DrawConfig::new(PoolSource::list(items.clone())).with_rank_all(true);

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut ranked = run_draw(&config, &mut rng).into_vec();
        assert_eq!(ranked.len(), 9);
        ranked.sort();
        let mut expected = items;
        expected.sort();
        assert_eq!(ranked, expected);
    }

    #[test]
    fn test_rank_all_with_repetition_draws_pool_size_times() {
        let config = DrawConfig::new(PoolSource::list(["a", "b", "c"]))
            .with_rank_all(true)
            .with_repetition(true);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let result = run_draw(&config, &mut rng);
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|w| ["a", "b", "c"].contains(&w.as_str())));
    }

    #[test]
    fn test_repetition_keeps_requested_count() {
        let config = DrawConfig::new(PoolSource::list(["x", "y"]))
            .with_winners(25)
            .with_repetition(true);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let result = run_draw(&config, &mut rng);
        assert_eq!(result.len(), 25);
        assert!(result.iter().all(|w| w == "x" || w == "y"));
    }

    #[test]
    fn test_degenerate_configs_yield_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let empty = DrawConfig::new(PoolSource::list(Vec::<String>::new())).with_winners(5);
        assert!(run_draw(&empty, &mut rng).is_empty());

        let empty_rep = empty.clone().with_repetition(true);
        assert!(run_draw(&empty_rep, &mut rng).is_empty());

        let zero = DrawConfig::new(PoolSource::list(["a"])).with_winners(0);
        assert!(run_draw(&zero, &mut rng).is_empty());

        let inverted = DrawConfig::new(PoolSource::range(10, 1)).with_winners(3);
        assert!(run_draw(&inverted, &mut rng).is_empty());
    }

    #[test]
    fn test_oversized_request_truncates() {
        let config = DrawConfig::new(PoolSource::list(["a", "b", "c"])).with_winners(10);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(run_draw(&config, &mut rng).len(), 3);
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = DrawConfig::new(PoolSource::list(names(30))).with_winners(6);
        let a = run_draw(&config, &mut ChaCha8Rng::seed_from_u64(42));
        let b = run_draw(&config, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);

        let mut e1 = DrawEngine::seeded(9);
        let mut e2 = DrawEngine::seeded(9);
        assert_eq!(e1.draw(&config), e2.draw(&config));
        assert_eq!(e1.draw_count(), 1);
    }

    #[test]
    fn test_range_matches_materialized_list() {
        // Sparse range pool must pick exactly what the materialized list picks.
        let range = DrawConfig::new(PoolSource::range(-3, 12)).with_winners(16);
        let listed = DrawConfig::new(PoolSource::list(
            (-3..=12).map(|n: i64| n.to_string()).collect::<Vec<_>>(),
        ))
        .with_winners(16);

        for seed in 0..20 {
            let a = run_draw(&range, &mut ChaCha8Rng::seed_from_u64(seed));
            let b = run_draw(&listed, &mut ChaCha8Rng::seed_from_u64(seed));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_huge_range_without_materializing() {
        let config = DrawConfig::new(PoolSource::range(1, 4_000_000_000)).with_winners(5);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = run_draw(&config, &mut rng);
        assert_eq!(result.len(), 5);
        let unique: HashSet<_> = result.iter().collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_single_candidate_pool() {
        let config = DrawConfig::new(PoolSource::range(42, 42));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(run_draw(&config, &mut rng).as_slice(), ["42".to_string()]);
    }
}
