//! Reveal Sequencer: phase state machine over a virtual clock
//!
//! ```text
//! animations on:   Intro ──intro──▶ Spinning ──all slots Stopped + pause──▶ Revealed
//! animations off / empty result:                                            Revealed
//! ```
//!
//! Every slot steps on its own timer; the only synchronization point is the
//! stop latch that schedules the reveal once the last slot has stopped.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::confetti::{ConfettiParticle, spawn_confetti};
use crate::decoy::build_decoy_sequence;
use crate::scheduler::{FiredTimer, TimerQueue};
use crate::slot::{SlotState, SpinPhase};
use crate::timing::RevealTiming;

/// Overall reveal phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealPhase {
    Intro,
    Spinning,
    Revealed,
}

/// Feedback hint attached to a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealCue {
    /// A slot passed another tick of its spin
    Tick { slot: usize },
    /// Results revealed
    Success,
}

/// Reveal options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealOptions {
    /// Full animated path; false jumps straight to Revealed
    pub animations_enabled: bool,
    pub timing: RevealTiming,
}

impl RevealOptions {
    pub fn animated(timing: RevealTiming) -> Self {
        Self {
            animations_enabled: true,
            timing,
        }
    }

    pub fn immediate() -> Self {
        Self {
            animations_enabled: false,
            timing: RevealTiming::default(),
        }
    }
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self::animated(RevealTiming::default())
    }
}

/// Rendering view of one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    /// Value currently shown (`None` before the slot's first step)
    pub displayed: Option<String>,
    pub spin_phase: SpinPhase,
}

/// Immutable state snapshot for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealSnapshot {
    /// Virtual time of the snapshot (ms since start)
    pub at_ms: u64,
    pub phase: RevealPhase,
    pub slots: Vec<SlotView>,
    /// Slots that reached `Stopped`
    pub stopped: usize,
    /// Confetti, non-empty only once revealed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub confetti: Vec<ConfettiParticle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cue: Option<RevealCue>,
}

impl RevealSnapshot {
    pub fn is_revealed(&self) -> bool {
        self.phase == RevealPhase::Revealed
    }

    /// Slot values in order; `None` for slots that have not started
    pub fn values(&self) -> Vec<Option<&str>> {
        self.slots.iter().map(|s| s.displayed.as_deref()).collect()
    }

    /// Final values, only once revealed
    pub fn revealed_values(&self) -> Option<Vec<String>> {
        if !self.is_revealed() {
            return None;
        }
        self.slots.iter().map(|s| s.displayed.clone()).collect()
    }
}

/// Timer keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RevealTimer {
    IntroElapsed,
    SlotStep(usize),
    RevealPause,
}

/// Reveal Sequencer
///
/// One instance per reveal. There is no replay: a new draw needs a new
/// sequencer.
#[derive(Debug)]
pub struct RevealSequencer {
    /// Authoritative values, in order
    results: Vec<String>,
    /// Timing configuration
    timing: RevealTiming,
    /// Current phase
    phase: RevealPhase,
    /// Per-slot spin state
    slots: Vec<SlotState>,
    /// Stop latch
    stopped_count: usize,
    /// Pending timers
    timers: TimerQueue<RevealTimer>,
    /// Confetti prepared at start, released on reveal
    reserved_confetti: Vec<ConfettiParticle>,
    /// Confetti currently shown
    confetti: Vec<ConfettiParticle>,
    /// Snapshots produced but not yet handed out
    pending: Vec<RevealSnapshot>,
    /// Set by `teardown`
    torn_down: bool,
}

impl RevealSequencer {
    /// Start a reveal of `results`.
    ///
    /// `decoy_pool` supplies the values shown while spinning; when empty the
    /// results themselves are used. The initial snapshot is returned by the
    /// first `advance*` call.
    pub fn start<R: Rng>(
        results: &[String],
        options: &RevealOptions,
        decoy_pool: &[String],
        rng: &mut R,
    ) -> Self {
        let timing = options.timing.clone();
        let confetti_count = if results.is_empty() {
            0
        } else {
            timing.confetti_count
        };
        let reserved_confetti = spawn_confetti(confetti_count, rng);

        let mut sequencer = Self {
            results: results.to_vec(),
            timing,
            phase: RevealPhase::Intro,
            slots: Vec::with_capacity(results.len()),
            stopped_count: 0,
            timers: TimerQueue::new(),
            reserved_confetti,
            confetti: Vec::new(),
            pending: Vec::new(),
            torn_down: false,
        };

        if !options.animations_enabled || results.is_empty() {
            sequencer.slots = results.iter().map(SlotState::stopped).collect();
            sequencer.stopped_count = results.len();
            let revealed = sequencer.enter_revealed();
            sequencer.pending.push(revealed);
            log::debug!(
                "reveal: immediate, {} slot(s), animations={}",
                results.len(),
                options.animations_enabled
            );
            return sequencer;
        }

        sequencer.slots = results
            .iter()
            .map(|value| {
                let sequence = build_decoy_sequence(
                    value,
                    decoy_pool,
                    results,
                    sequencer.timing.decoy_count,
                    rng,
                );
                SlotState::spinning(sequence, &sequencer.timing)
            })
            .collect();

        sequencer
            .timers
            .schedule(sequencer.timing.intro_duration_ms, RevealTimer::IntroElapsed);
        let intro = sequencer.snapshot_with(None);
        sequencer.pending.push(intro);

        log::debug!(
            "reveal: animated, {} slot(s), estimated {:.0}ms",
            results.len(),
            sequencer.timing.total_duration(results.len())
        );
        sequencer
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CLOCK
    // ═══════════════════════════════════════════════════════════════════════════

    /// Fire everything due up to `now_ms` and return the resulting snapshots
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<RevealSnapshot> {
        if self.torn_down {
            return Vec::new();
        }

        let mut out = std::mem::take(&mut self.pending);
        while let Some(fired) = self.timers.pop_due(now_ms) {
            out.push(self.handle(fired));
        }
        self.timers.set_now(now_ms);
        out
    }

    /// Advance the clock by `elapsed_ms`
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<RevealSnapshot> {
        let target = self.now_ms().saturating_add(elapsed_ms);
        self.advance_to(target)
    }

    /// Next time anything happens, `None` when finished or torn down
    pub fn next_due_ms(&mut self) -> Option<u64> {
        if self.torn_down {
            return None;
        }
        if !self.pending.is_empty() {
            return Some(self.now_ms());
        }
        self.timers.next_due_ms()
    }

    /// Jump from deadline to deadline until nothing is left
    pub fn run_to_end(&mut self) -> Vec<RevealSnapshot> {
        self.frames().collect()
    }

    /// Snapshot stream over virtual time
    pub fn frames(&mut self) -> RevealFrames<'_> {
        RevealFrames {
            sequencer: self,
            buffer: VecDeque::new(),
        }
    }

    /// Cancel every pending timer. Later `advance*` calls produce nothing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.timers.cancel_all();
        self.pending.clear();
        log::debug!("reveal: torn down in phase {:?}", self.phase);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TRANSITIONS
    // ═══════════════════════════════════════════════════════════════════════════

    fn handle(&mut self, fired: FiredTimer<RevealTimer>) -> RevealSnapshot {
        match fired.key {
            RevealTimer::IntroElapsed => {
                self.phase = RevealPhase::Spinning;
                for index in 0..self.slots.len() {
                    self.timers.schedule(
                        self.timing.slot_start_offset(index),
                        RevealTimer::SlotStep(index),
                    );
                }
                self.snapshot_with(None)
            }
            RevealTimer::SlotStep(index) => {
                let cue = self.step_slot(index);
                self.snapshot_with(cue)
            }
            RevealTimer::RevealPause => self.enter_revealed(),
        }
    }

    fn step_slot(&mut self, index: usize) -> Option<RevealCue> {
        let slot = std::mem::take(&mut self.slots[index]);
        let (slot, outcome) = slot.step(&self.timing);
        let stopped = slot.is_stopped();
        self.slots[index] = slot;

        match outcome.next_delay_ms {
            Some(delay) => {
                self.timers.schedule(delay, RevealTimer::SlotStep(index));
            }
            None => {
                self.stopped_count += 1;
                log::debug!(
                    "reveal: slot {index} stopped at {}ms ({}/{})",
                    self.now_ms(),
                    self.stopped_count,
                    self.slots.len()
                );
                if self.stopped_count == self.slots.len() {
                    self.timers
                        .schedule(self.timing.reveal_pause_ms, RevealTimer::RevealPause);
                }
            }
        }

        let ticks = self.timing.tick_every;
        (!stopped && ticks > 0 && outcome.steps_taken % ticks == 0)
            .then_some(RevealCue::Tick { slot: index })
    }

    fn enter_revealed(&mut self) -> RevealSnapshot {
        self.phase = RevealPhase::Revealed;
        self.confetti = std::mem::take(&mut self.reserved_confetti);
        debug_assert!(
            self.slots
                .iter()
                .map(SlotState::displayed)
                .eq(self.results.iter().map(|r| Some(r.as_str()))),
            "revealed values diverged from the draw result"
        );
        log::debug!("reveal: revealed at {}ms", self.now_ms());
        self.snapshot_with(Some(RevealCue::Success))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Current state (no cue)
    pub fn snapshot(&self) -> RevealSnapshot {
        self.snapshot_with(None)
    }

    fn snapshot_with(&self, cue: Option<RevealCue>) -> RevealSnapshot {
        RevealSnapshot {
            at_ms: self.now_ms(),
            phase: self.phase,
            slots: self
                .slots
                .iter()
                .map(|s| SlotView {
                    displayed: s.displayed().map(str::to_string),
                    spin_phase: s.phase(),
                })
                .collect(),
            stopped: self.stopped_count,
            confetti: self.confetti.clone(),
            cue,
        }
    }

    /// The draw result being revealed, available at any time
    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn is_revealed(&self) -> bool {
        self.phase == RevealPhase::Revealed
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn slots(&self) -> &[SlotState] {
        &self.slots
    }

    pub fn stopped_count(&self) -> usize {
        self.stopped_count
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn timing(&self) -> &RevealTiming {
        &self.timing
    }

    pub fn confetti(&self) -> &[ConfettiParticle] {
        &self.confetti
    }
}

/// Iterator over snapshots, jumping the virtual clock to each deadline
pub struct RevealFrames<'a> {
    sequencer: &'a mut RevealSequencer,
    buffer: VecDeque<RevealSnapshot>,
}

impl Iterator for RevealFrames<'_> {
    type Item = RevealSnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        while self.buffer.is_empty() {
            let due = self.sequencer.next_due_ms()?;
            self.buffer.extend(self.sequencer.advance_to(due));
        }
        self.buffer.pop_front()
    }
}
