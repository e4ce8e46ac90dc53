//! Haptic feedback sinks
//!
//! The session decides *when* feedback happens; a sink decides how (device
//! haptics, terminal bell, log line, nothing).

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Impact strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticStyle {
    Light,
    Medium,
    Heavy,
}

/// Notification kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

/// One feedback event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackEvent {
    Impact(HapticStyle),
    Notification(NotificationKind),
}

/// Feedback sink
pub trait Feedback: Send + Sync {
    fn emit(&self, event: FeedbackEvent);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn emit(&self, _event: FeedbackEvent) {}
}

/// Writes events to the log at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn emit(&self, event: FeedbackEvent) {
        log::debug!("feedback: {event:?}");
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    events: Mutex<Vec<FeedbackEvent>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FeedbackEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self, event: FeedbackEvent) -> usize {
        self.events.lock().iter().filter(|e| **e == event).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Feedback for RecordingFeedback {
    fn emit(&self, event: FeedbackEvent) {
        self.events.lock().push(event);
    }
}
