//! Draw configuration and result types

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Kind of candidate source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Explicit list of named items
    List,
    /// Inclusive integer range
    NumericRange,
}

impl SourceKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::List => "List",
            Self::NumericRange => "Numeric range",
        }
    }
}

/// Where the candidates of a draw come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PoolSource {
    /// Unique, non-empty items in user order
    List { items: Vec<String> },
    /// Every integer in `[min, max]`; empty when `max < min`
    NumericRange { min: i64, max: i64 },
}

impl PoolSource {
    /// List source from anything string-like
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Numeric range source
    pub fn range(min: i64, max: i64) -> Self {
        Self::NumericRange { min, max }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::List { .. } => SourceKind::List,
            Self::NumericRange { .. } => SourceKind::NumericRange,
        }
    }

    /// Number of candidates in the pool
    pub fn size(&self) -> u64 {
        match self {
            Self::List { items } => items.len() as u64,
            Self::NumericRange { min, max } => range_len(*min, *max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Candidate at `index` in pool order
    pub fn get(&self, index: u64) -> Option<String> {
        match self {
            Self::List { items } => items.get(index as usize).cloned(),
            Self::NumericRange { min, max } => {
                (index < range_len(*min, *max)).then(|| range_value(*min, index).to_string())
            }
        }
    }

    /// Bounded random sample of candidates, used as decoys by the reveal.
    ///
    /// Lists smaller than `limit` are returned whole; larger pools are sampled
    /// with repetition.
    pub fn decoy_candidates<R: Rng>(&self, limit: usize, rng: &mut R) -> Vec<String> {
        let size = self.size();
        if size == 0 || limit == 0 {
            return Vec::new();
        }
        if size <= limit as u64 {
            return (0..size).filter_map(|i| self.get(i)).collect();
        }
        (0..limit)
            .filter_map(|_| self.get(rng.random_range(0..size)))
            .collect()
    }
}

/// Number of integers in `[min, max]`
pub(crate) fn range_len(min: i64, max: i64) -> u64 {
    if max < min {
        0
    } else {
        // Saturates only for the full i64 domain, which is 2^64 values.
        u64::try_from(max as i128 - min as i128 + 1).unwrap_or(u64::MAX)
    }
}

/// `min + offset` for an offset known to stay within the range
pub(crate) fn range_value(min: i64, offset: u64) -> i64 {
    (min as i128 + offset as i128) as i64
}

/// Input to the Draw Engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawConfig {
    /// Candidate pool
    pub source: PoolSource,
    /// Requested winners (ignored in ranking mode)
    pub winners_count: u32,
    /// Sample with replacement
    pub allow_repetition: bool,
    /// Draw the whole pool as a ranking
    pub rank_all: bool,
}

impl DrawConfig {
    /// Single-winner draw without repetition
    pub fn new(source: PoolSource) -> Self {
        Self {
            source,
            winners_count: 1,
            allow_repetition: false,
            rank_all: false,
        }
    }

    pub fn with_winners(mut self, count: u32) -> Self {
        self.winners_count = count;
        self
    }

    pub fn with_repetition(mut self, allow: bool) -> Self {
        self.allow_repetition = allow;
        self
    }

    pub fn with_rank_all(mut self, rank_all: bool) -> Self {
        self.rank_all = rank_all;
        self
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source.kind()
    }

    pub fn pool_size(&self) -> u64 {
        self.source.size()
    }

    /// Number of draw steps the engine performs.
    ///
    /// The result can still be shorter if the working pool empties first.
    pub fn effective_count(&self) -> u64 {
        let size = self.pool_size();
        if self.rank_all {
            size
        } else if self.allow_repetition {
            u64::from(self.winners_count)
        } else {
            u64::from(self.winners_count).min(size)
        }
    }
}

/// Ordered winners of one draw (position 0 = first drawn)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawResult {
    winners: Vec<String>,
}

impl DrawResult {
    pub fn new(winners: Vec<String>) -> Self {
        Self { winners }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.winners
    }

    pub fn len(&self) -> usize {
        self.winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.winners.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.winners
    }
}

impl From<Vec<String>> for DrawResult {
    fn from(winners: Vec<String>) -> Self {
        Self::new(winners)
    }
}

impl<'a> IntoIterator for &'a DrawResult {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.winners.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_pool_sizes() {
        assert_eq!(PoolSource::list(["a", "b", "c"]).size(), 3);
        assert_eq!(PoolSource::range(1, 10).size(), 10);
        assert_eq!(PoolSource::range(-5, 5).size(), 11);
        assert_eq!(PoolSource::range(7, 7).size(), 1);
        assert_eq!(PoolSource::range(10, 1).size(), 0);
        assert_eq!(PoolSource::range(i64::MIN, i64::MAX).size(), u64::MAX);
    }

    #[test]
    fn test_range_get() {
        let source = PoolSource::range(-2, 2);
        assert_eq!(source.get(0).as_deref(), Some("-2"));
        assert_eq!(source.get(4).as_deref(), Some("2"));
        assert_eq!(source.get(5), None);
    }

    #[test]
    fn test_effective_count() {
        let base = DrawConfig::new(PoolSource::list(["a", "b", "c"]));

        assert_eq!(base.clone().with_winners(2).effective_count(), 2);
        assert_eq!(base.clone().with_winners(9).effective_count(), 3);
        assert_eq!(
            base.clone()
                .with_winners(9)
                .with_repetition(true)
                .effective_count(),
            9
        );
        assert_eq!(base.clone().with_rank_all(true).effective_count(), 3);
        assert_eq!(base.with_winners(0).effective_count(), 0);
    }

    #[test]
    fn test_decoy_candidates_small_pool_is_whole_list() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let source = PoolSource::list(["a", "b"]);
        assert_eq!(source.decoy_candidates(16, &mut rng), vec!["a", "b"]);
    }

    #[test]
    fn test_decoy_candidates_large_range_is_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let source = PoolSource::range(1, 1_000_000);
        let decoys = source.decoy_candidates(32, &mut rng);
        assert_eq!(decoys.len(), 32);
        for d in &decoys {
            let n: i64 = d.parse().unwrap();
            assert!((1..=1_000_000).contains(&n));
        }
    }

    #[test]
    fn test_result_serializes_as_plain_list() {
        let result = DrawResult::new(vec!["Ana".into(), "Bruno".into()]);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"["Ana","Bruno"]"#);
    }
}
