//! # raffle-app: raffle session
//!
//! Explicit session object replacing ambient settings/history lookups: the
//! caller owns a [`RaffleApp`] and passes configuration in.
//!
//! ## Flow
//!
//! ```text
//! DrawConfig ──readiness()──▶ blocked? ──▶ AppError::DrawBlocked
//!     │
//!     ▼ run_draw(config, rng)
//! DrawResult ──▶ HistoryLog::record (exactly once)
//!     │
//!     ▼ start_reveal
//! RevealSequencer ──snapshots──▶ renderer
//!                      └─cues──▶ Feedback (only when sound is enabled)
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod feedback;

pub use app::*;
pub use config::*;
pub use error::*;
pub use feedback::*;
