//! Per-slot spin state machine
//!
//! A slot walks its decoy sequence one value per step. The last element of
//! the sequence is the slot's final value, so a stopped slot always shows it.

use serde::{Deserialize, Serialize};

use crate::timing::RevealTiming;

/// Spin phase of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpinPhase {
    /// Cycling at full speed (or not started yet)
    #[default]
    Spinning,
    /// Inside the slowdown window
    Slowing,
    /// Showing the final value; never changes again
    Stopped,
}

/// What a step produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Delay until the next step, `None` once stopped
    pub next_delay_ms: Option<f64>,
    /// Steps taken so far by this slot
    pub steps_taken: usize,
}

/// State of one reveal slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotState {
    /// Decoys followed by the final value
    sequence: Vec<String>,
    /// Index of the next value to show
    cursor: usize,
    /// Value currently shown
    displayed: Option<String>,
    /// Spin phase
    phase: SpinPhase,
    /// Interval used for the last scheduled step (ms)
    interval_ms: f64,
}

impl SlotState {
    /// Slot that will spin through `sequence`; its last element is the final value
    pub fn spinning(sequence: Vec<String>, timing: &RevealTiming) -> Self {
        Self {
            sequence,
            cursor: 0,
            displayed: None,
            phase: SpinPhase::Spinning,
            interval_ms: timing.base_step_ms,
        }
    }

    /// Slot already showing its final value
    pub fn stopped(final_value: impl Into<String>) -> Self {
        let final_value = final_value.into();
        Self {
            sequence: vec![final_value.clone()],
            cursor: 1,
            displayed: Some(final_value),
            phase: SpinPhase::Stopped,
            interval_ms: 0.0,
        }
    }

    /// Advance one step: show the next value and derive the next interval.
    ///
    /// Stepping a stopped slot is a no-op.
    pub fn step(mut self, timing: &RevealTiming) -> (Self, StepOutcome) {
        if self.phase == SpinPhase::Stopped || self.cursor >= self.sequence.len() {
            self.phase = SpinPhase::Stopped;
            let steps_taken = self.cursor;
            return (
                self,
                StepOutcome {
                    next_delay_ms: None,
                    steps_taken,
                },
            );
        }

        self.displayed = Some(self.sequence[self.cursor].clone());
        self.cursor += 1;
        let remaining = self.sequence.len() - self.cursor;

        let next_delay_ms = if remaining == 0 {
            self.phase = SpinPhase::Stopped;
            None
        } else {
            self.interval_ms = timing.next_interval(self.interval_ms, remaining);
            self.phase = if remaining > timing.slowdown_threshold {
                SpinPhase::Spinning
            } else {
                SpinPhase::Slowing
            };
            Some(self.interval_ms)
        };

        let steps_taken = self.cursor;
        (
            self,
            StepOutcome {
                next_delay_ms,
                steps_taken,
            },
        )
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn is_stopped(&self) -> bool {
        self.phase == SpinPhase::Stopped
    }

    pub fn displayed(&self) -> Option<&str> {
        self.displayed.as_deref()
    }

    /// Value the slot will stop on
    pub fn final_value(&self) -> Option<&str> {
        self.sequence.last().map(String::as_str)
    }

    /// Steps left before stopping
    pub fn remaining(&self) -> usize {
        self.sequence.len().saturating_sub(self.cursor)
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }
}
