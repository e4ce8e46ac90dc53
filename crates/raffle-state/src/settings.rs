//! User settings
//!
//! Read by the session: `animations_enabled` selects the reveal path and
//! `sound_enabled` gates haptic feedback. `theme` is only used for styling.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::StateResult;
use crate::store::KeyValueStore;

/// Storage key of the settings document
pub const SETTINGS_KEY: &str = "raffle_settings";

/// Colour theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the platform
    #[default]
    System,
}

impl ThemePreference {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::System => "System",
        }
    }
}

impl std::str::FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Persisted user settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub theme: ThemePreference,
    /// Haptic feedback on draw, tick and reveal
    pub sound_enabled: bool,
    /// Animated reveal; off reveals immediately
    pub animations_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemePreference::System,
            sound_enabled: true,
            animations_enabled: true,
        }
    }
}

/// Settings backed by a key-value store.
///
/// Each change saves the complete settings document; the cached copy is only
/// updated once the save succeeded.
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Settings>,
}

impl SettingsStore {
    /// Load settings; missing or unreadable data falls back to defaults
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let current = match store.get(SETTINGS_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("settings: ignoring unreadable stored settings: {e}");
                Settings::default()
            }),
            Ok(None) => Settings::default(),
            Err(e) => {
                log::warn!("settings: failed to load, using defaults: {e}");
                Settings::default()
            }
        };

        Self {
            store,
            current: RwLock::new(current),
        }
    }

    /// Current settings
    pub fn get(&self) -> Settings {
        *self.current.read()
    }

    pub fn update_theme(&self, theme: ThemePreference) -> StateResult<Settings> {
        self.update(|s| s.theme = theme)
    }

    pub fn toggle_sound(&self) -> StateResult<Settings> {
        self.update(|s| s.sound_enabled = !s.sound_enabled)
    }

    pub fn toggle_animations(&self) -> StateResult<Settings> {
        self.update(|s| s.animations_enabled = !s.animations_enabled)
    }

    /// Replace all settings
    pub fn replace(&self, settings: Settings) -> StateResult<Settings> {
        self.update(|s| *s = settings)
    }

    fn update(&self, change: impl FnOnce(&mut Settings)) -> StateResult<Settings> {
        let mut current = self.current.write();
        let mut next = *current;
        change(&mut next);

        let json = serde_json::to_string(&next)?;
        if let Err(e) = self.store.set(SETTINGS_KEY, &json) {
            log::error!("settings: failed to save: {e}");
            return Err(e);
        }

        *current = next;
        log::info!(
            "settings: theme={} sound={} animations={}",
            next.theme.display_name(),
            next.sound_enabled,
            next.animations_enabled
        );
        Ok(next)
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("current", &*self.current.read())
            .finish_non_exhaustive()
    }
}
