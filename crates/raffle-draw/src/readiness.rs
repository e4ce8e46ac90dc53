//! Pre-draw readiness gate
//!
//! A blocked draw is a disabled action with an advisory message, not an error.

use serde::{Deserialize, Serialize};

use crate::config::{DrawConfig, PoolSource};

/// Most draw steps a single draw may take
pub const MAX_DRAW_COUNT: u64 = 1_000_000;

/// Why a draw cannot start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockReason {
    /// List source has no items
    EmptyList,
    /// Numeric range has `max < min`
    InvalidRange { min: i64, max: i64 },
    /// Zero winners requested outside ranking mode
    NoWinnersRequested,
    /// Not enough distinct candidates for a draw without repetition
    NotEnoughCandidates { available: u64, requested: u32 },
    /// The draw would take more steps than [`MAX_DRAW_COUNT`]
    TooManyDraws { requested: u64, limit: u64 },
}

impl BlockReason {
    /// User-facing advisory message
    pub fn advisory(&self) -> String {
        match self {
            Self::EmptyList => "Add at least one item to the list".to_string(),
            Self::InvalidRange { min, max } => {
                format!("Maximum ({max}) must be greater than or equal to minimum ({min})")
            }
            Self::NoWinnersRequested => "Choose at least one winner".to_string(),
            Self::NotEnoughCandidates {
                available,
                requested,
            } => format!(
                "Only {available} candidate(s) for {requested} winner(s); allow repetition or lower the winner count"
            ),
            Self::TooManyDraws { requested, limit } => format!(
                "{requested} draws requested; at most {limit} are allowed, narrow the range or lower the winner count"
            ),
        }
    }
}

/// Result of the pre-draw gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawReadiness {
    Ready,
    Blocked(BlockReason),
}

impl DrawReadiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn advisory(&self) -> Option<String> {
        match self {
            Self::Ready => None,
            Self::Blocked(reason) => Some(reason.advisory()),
        }
    }
}

impl DrawConfig {
    /// Check whether this configuration may be drawn
    pub fn readiness(&self) -> DrawReadiness {
        match &self.source {
            PoolSource::List { items } if items.is_empty() => {
                return DrawReadiness::Blocked(BlockReason::EmptyList);
            }
            PoolSource::NumericRange { min, max } if max < min => {
                return DrawReadiness::Blocked(BlockReason::InvalidRange {
                    min: *min,
                    max: *max,
                });
            }
            _ => {}
        }

        if !self.rank_all {
            if self.winners_count == 0 {
                return DrawReadiness::Blocked(BlockReason::NoWinnersRequested);
            }

            let available = self.pool_size();
            if !self.allow_repetition && available < u64::from(self.winners_count) {
                return DrawReadiness::Blocked(BlockReason::NotEnoughCandidates {
                    available,
                    requested: self.winners_count,
                });
            }
        }

        let requested = self.effective_count();
        if requested > MAX_DRAW_COUNT {
            return DrawReadiness::Blocked(BlockReason::TooManyDraws {
                requested,
                limit: MAX_DRAW_COUNT,
            });
        }

        DrawReadiness::Ready
    }

    pub fn can_draw(&self) -> bool {
        self.readiness().is_ready()
    }
}
