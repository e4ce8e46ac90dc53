//! Timing profiles for the reveal presentation

use serde::{Deserialize, Serialize};

/// Timing profile for reveals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Normal presentation
    #[default]
    Normal,
    /// Fast mode
    Turbo,
    /// No waiting between frames (the sequence of frames is unchanged)
    Instant,
    /// Scaled from another profile
    Custom,
}

impl TimingProfile {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Turbo => "Turbo",
            Self::Instant => "Instant",
            Self::Custom => "Custom",
        }
    }
}

/// Detailed reveal timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealTiming {
    /// Profile type
    pub profile: TimingProfile,

    /// Intro phase duration (ms)
    pub intro_duration_ms: f64,

    /// Start offset between consecutive slots (ms)
    pub slot_stagger_ms: f64,

    /// Step interval while spinning at full speed (ms)
    pub base_step_ms: f64,

    /// Multiplicative interval growth per step while slowing
    pub step_growth: f64,

    /// Slowest step interval (ms)
    pub max_step_ms: f64,

    /// Remaining steps at which a slot starts slowing
    pub slowdown_threshold: usize,

    /// Decoy values shown before the final value
    pub decoy_count: usize,

    /// Pause between the last slot stopping and the reveal (ms)
    pub reveal_pause_ms: f64,

    /// Confetti particles spawned on reveal
    pub confetti_count: usize,

    /// Emit a tick cue every N steps of a slot (0 = never)
    pub tick_every: usize,
}

impl RevealTiming {
    /// Normal presentation
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            intro_duration_ms: 800.0,
            slot_stagger_ms: 250.0,
            base_step_ms: 50.0,
            step_growth: 1.25,
            max_step_ms: 400.0,
            slowdown_threshold: 8,
            decoy_count: 20,
            reveal_pause_ms: 400.0,
            confetti_count: 50,
            tick_every: 3,
        }
    }

    /// Fast mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            decoy_count: 12,
            slowdown_threshold: 5,
            ..Self::normal().scaled(0.5)
        }
    }

    /// Same frames as normal, zero durations
    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            ..Self::normal().scaled(0.0)
        }
    }

    /// Get timing for profile.
    ///
    /// `Custom` has no durations of its own and starts from the normal ones.
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
            TimingProfile::Custom => Self {
                profile: TimingProfile::Custom,
                ..Self::normal()
            },
        }
    }

    /// Scale every duration by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        Self {
            profile: TimingProfile::Custom,
            intro_duration_ms: self.intro_duration_ms * factor,
            slot_stagger_ms: self.slot_stagger_ms * factor,
            base_step_ms: self.base_step_ms * factor,
            max_step_ms: self.max_step_ms * factor,
            reveal_pause_ms: self.reveal_pause_ms * factor,
            ..self.clone()
        }
    }

    /// Interval after a step, given the previous interval and steps remaining
    pub fn next_interval(&self, previous_ms: f64, remaining: usize) -> f64 {
        if remaining > self.slowdown_threshold {
            self.base_step_ms
        } else {
            (previous_ms * self.step_growth).min(self.max_step_ms)
        }
    }

    /// Start offset of slot `index` after the intro
    pub fn slot_start_offset(&self, index: usize) -> f64 {
        self.slot_stagger_ms * index as f64
    }

    /// Time a single slot needs for `steps` steps, first step included
    pub fn slot_duration(&self, steps: usize) -> f64 {
        let mut interval = self.base_step_ms;
        let mut total = 0.0;
        for shown in 1..steps {
            interval = self.next_interval(interval, steps - shown);
            total += interval;
        }
        total
    }

    /// Estimated duration of a full reveal with `slots` winners
    pub fn total_duration(&self, slots: usize) -> f64 {
        if slots == 0 {
            return 0.0;
        }
        self.intro_duration_ms
            + self.slot_start_offset(slots - 1)
            + self.slot_duration(self.decoy_count + 1)
            + self.reveal_pause_ms
    }
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self::normal()
    }
}
