//! # raffle-reveal: Reveal Sequencer
//!
//! Turns an already-computed draw result into a timed presentation: a short
//! intro, one independently decelerating "spinning" slot per winner, then a
//! terminal revealed state with confetti. The animation only delays the
//! disclosure; the revealed values are always exactly the draw result.
//!
//! ## Architecture
//!
//! ```text
//! RevealSequencer
//!     │
//!     ├── RevealTiming (intro, stagger, step curve, pause)
//!     ├── TimerQueue<RevealTimer> (virtual clock, cancellable)
//!     ├── Vec<SlotState> (decoy sequence → Spinning → Slowing → Stopped)
//!     └── stop latch (all slots stopped → pause → Revealed)
//!           │
//!           v
//!     RevealSnapshot stream
//! ```
//!
//! Time is virtual: drivers call `advance_to` with wall-clock milliseconds,
//! tests jump straight to each deadline.

pub mod confetti;
pub mod decoy;
pub mod scheduler;
pub mod sequencer;
pub mod slot;
pub mod timing;

pub use confetti::*;
pub use decoy::*;
pub use scheduler::*;
pub use sequencer::*;
pub use slot::*;
pub use timing::*;
