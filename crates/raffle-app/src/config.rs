//! Application configuration
//!
//! JSON file with defaults for every field; a missing or unreadable file
//! yields the default configuration.

use std::fs;
use std::path::{Path, PathBuf};

use raffle_reveal::{RevealTiming, TimingProfile};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "RAFFLE_DATA_DIR";

/// Default cap on decoy values sampled from large pools
const DEFAULT_DECOY_SAMPLE_LIMIT: usize = 200;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where settings and history live (platform data dir when unset)
    pub data_dir: Option<PathBuf>,
    /// Reveal pacing
    pub timing_profile: TimingProfile,
    /// Maximum decoy values sampled from a large pool
    pub decoy_sample_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            timing_profile: TimingProfile::Normal,
            decoy_sample_limit: DEFAULT_DECOY_SAMPLE_LIMIT,
        }
    }
}

impl AppConfig {
    /// Load configuration from standard location
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load configuration from specified path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("config: ignoring invalid {:?}: {e}", path);
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("config: cannot read {:?}, using defaults: {e}", path);
                Self::default()
            }
        }
    }

    /// Save configuration to specified path
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Get default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("raffle"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.json")
    }

    /// Data directory: environment override, then config, then platform default
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_local_dir()
            .map(|d| d.join("raffle"))
            .unwrap_or_else(|| PathBuf::from(".raffle"))
    }

    /// Reveal timing for the configured profile
    pub fn timing(&self) -> RevealTiming {
        RevealTiming::from_profile(self.timing_profile)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_timing_profile(mut self, profile: TimingProfile) -> Self {
        self.timing_profile = profile;
        self
    }
}
