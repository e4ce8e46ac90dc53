//! Session error types

use raffle_draw::BlockReason;
use raffle_state::StateError;
use thiserror::Error;

/// Session error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Draw blocked: {}", .0.advisory())]
    DrawBlocked(BlockReason),

    #[error("No history entry matches {0:?}")]
    UnknownEntry(String),

    #[error("{matches} history entries match {prefix:?}; use a longer id")]
    AmbiguousEntry { prefix: String, matches: usize },
}

pub type AppResult<T> = Result<T, AppError>;
