//! Raffle session
//!
//! Wires the Draw Engine, the history log and the Reveal Sequencer together.
//! A draw is computed once; the same `DrawResult` is persisted and handed to
//! the reveal, so what is shown can never differ from what was recorded.

use std::sync::Arc;

use rand::Rng;
use raffle_draw::{DrawConfig, DrawReadiness, DrawResult, run_draw};
use raffle_reveal::{RevealCue, RevealOptions, RevealSequencer, RevealSnapshot};
use raffle_state::{
    ExportFormat, FileStore, HistoryEntry, HistoryLog, KeyValueStore, Settings, SettingsStore,
    StateResult, ThemePreference,
};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::feedback::{Feedback, FeedbackEvent, HapticStyle, NotificationKind, SilentFeedback};

/// Outcome of one draw
#[derive(Debug)]
pub struct DrawOutcome {
    /// Configuration the draw ran with
    pub config: DrawConfig,
    /// Authoritative result
    pub result: DrawResult,
    /// The history entry, or why it could not be saved
    pub persisted: StateResult<HistoryEntry>,
}

impl DrawOutcome {
    pub fn entry(&self) -> Option<&HistoryEntry> {
        self.persisted.as_ref().ok()
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted.is_ok()
    }
}

/// Raffle session
pub struct RaffleApp {
    config: AppConfig,
    settings: SettingsStore,
    history: HistoryLog,
    feedback: Arc<dyn Feedback>,
}

impl RaffleApp {
    /// Session over the file store in the configured data directory
    pub fn open(config: AppConfig) -> Self {
        let dir = config.resolved_data_dir();
        log::debug!("app: data dir {:?}", dir);
        Self::with_store(config, Arc::new(FileStore::new(dir)))
    }

    /// Session over any store
    pub fn with_store(config: AppConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            settings: SettingsStore::open(store.clone()),
            history: HistoryLog::open(store),
            config,
            feedback: Arc::new(SilentFeedback),
        }
    }

    pub fn with_feedback(mut self, feedback: Arc<dyn Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DRAW
    // ═══════════════════════════════════════════════════════════════════════════

    /// Gate, draw, and record one history entry.
    ///
    /// A blocked configuration is an error and nothing is recorded. A failed
    /// save is reported in the outcome; the result stays valid.
    pub fn perform_draw<R: Rng>(&self, config: &DrawConfig, rng: &mut R) -> AppResult<DrawOutcome> {
        if let DrawReadiness::Blocked(reason) = config.readiness() {
            log::debug!("app: draw blocked: {}", reason.advisory());
            self.haptic(FeedbackEvent::Notification(NotificationKind::Warning));
            return Err(AppError::DrawBlocked(reason));
        }

        self.haptic(FeedbackEvent::Impact(HapticStyle::Heavy));
        let result = run_draw(config, rng);

        let persisted = self.history.record(config, &result);
        if let Err(e) = &persisted {
            log::error!("app: draw result not saved to history: {e}");
        }

        Ok(DrawOutcome {
            config: config.clone(),
            result,
            persisted,
        })
    }

    /// Draw again with the configuration of a history entry
    pub fn repeat_draw<R: Rng>(&self, id_prefix: &str, rng: &mut R) -> AppResult<DrawOutcome> {
        let entry = self.find_entry(id_prefix)?;
        self.perform_draw(&entry.to_config(), rng)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // REVEAL
    // ═══════════════════════════════════════════════════════════════════════════

    /// Reveal options from the current settings and configured timing
    pub fn reveal_options(&self) -> RevealOptions {
        RevealOptions {
            animations_enabled: self.settings.get().animations_enabled,
            timing: self.config.timing(),
        }
    }

    /// Start the reveal of a draw outcome
    pub fn start_reveal<R: Rng>(&self, outcome: &DrawOutcome, rng: &mut R) -> RevealSequencer {
        self.start_reveal_with(outcome, &self.reveal_options(), rng)
    }

    /// Start a reveal with explicit options (e.g. a one-off animation override)
    pub fn start_reveal_with<R: Rng>(
        &self,
        outcome: &DrawOutcome,
        options: &RevealOptions,
        rng: &mut R,
    ) -> RevealSequencer {
        let decoys = outcome
            .config
            .source
            .decoy_candidates(self.config.decoy_sample_limit, rng);
        RevealSequencer::start(outcome.result.as_slice(), options, &decoys, rng)
    }

    /// Forward a snapshot's cue to the feedback sink
    pub fn handle_snapshot(&self, snapshot: &RevealSnapshot) {
        match snapshot.cue {
            Some(RevealCue::Tick { .. }) => {
                self.haptic(FeedbackEvent::Impact(HapticStyle::Light));
            }
            Some(RevealCue::Success) => {
                self.haptic(FeedbackEvent::Notification(NotificationKind::Success));
            }
            None => {}
        }
    }

    fn haptic(&self, event: FeedbackEvent) {
        if self.settings.get().sound_enabled {
            self.feedback.emit(event);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // HISTORY
    // ═══════════════════════════════════════════════════════════════════════════

    /// All entries, newest first
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.entries()
    }

    /// Entry by full id or an id prefix that matches exactly one entry
    pub fn find_entry(&self, id_prefix: &str) -> AppResult<HistoryEntry> {
        let mut matches = self.history.find_by_prefix(id_prefix);
        match matches.len() {
            0 => Err(AppError::UnknownEntry(id_prefix.to_string())),
            1 => Ok(matches.remove(0)),
            n => Err(AppError::AmbiguousEntry {
                prefix: id_prefix.to_string(),
                matches: n,
            }),
        }
    }

    pub fn delete_entry(&self, id_prefix: &str) -> AppResult<HistoryEntry> {
        let entry = self.find_entry(id_prefix)?;
        self.history.delete(entry.id)?;
        Ok(entry)
    }

    pub fn clear_history(&self) -> AppResult<()> {
        self.history.clear()?;
        self.haptic(FeedbackEvent::Notification(NotificationKind::Warning));
        Ok(())
    }

    /// Render an entry for sharing or printing
    pub fn export_entry(&self, id_prefix: &str, format: ExportFormat) -> AppResult<String> {
        let entry = self.find_entry(id_prefix)?;
        Ok(format.render(&entry))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SETTINGS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn settings(&self) -> Settings {
        self.settings.get()
    }

    pub fn update_theme(&self, theme: ThemePreference) -> AppResult<Settings> {
        Ok(self.settings.update_theme(theme)?)
    }

    pub fn toggle_sound(&self) -> AppResult<Settings> {
        Ok(self.settings.toggle_sound()?)
    }

    pub fn toggle_animations(&self) -> AppResult<Settings> {
        Ok(self.settings.toggle_animations()?)
    }
}

impl std::fmt::Debug for RaffleApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaffleApp")
            .field("config", &self.config)
            .field("settings", &self.settings)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}
