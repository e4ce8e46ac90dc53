//! # raffle-draw: Draw Engine
//!
//! Computes the outcome of a raffle: given a candidate pool (explicit list or
//! inclusive numeric range) and draw parameters, produces the ordered list of
//! winners. Pure and synchronous; randomness is injected.
//!
//! ## Architecture
//!
//! ```text
//! ItemList / import text ──┐
//!                          v
//!     DrawConfig { PoolSource, winners_count, allow_repetition, rank_all }
//!          │                     │
//!          │ readiness()         │ run_draw(config, rng)
//!          v                     v
//!     DrawReadiness          DrawResult (ordered winners)
//! ```

pub mod config;
pub mod engine;
pub mod pool;
pub mod readiness;

pub use config::*;
pub use engine::*;
pub use pool::*;
pub use readiness::*;
