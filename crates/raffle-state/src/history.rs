//! Draw History
//!
//! Append-only log of completed draws, newest first. Entries are immutable
//! once written; deletion filters by id and clear empties the log.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::RwLock;
use raffle_draw::{DrawConfig, DrawResult, PoolSource, SourceKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StateResult;
use crate::store::KeyValueStore;

/// Storage key of the history document
pub const HISTORY_KEY: &str = "raffle_history";

/// Results shown in full by [`HistoryEntry::results_preview`]
const PREVIEW_RESULTS: usize = 2;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// One completed draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub source_kind: SourceKind,
    /// Candidate list at draw time (empty for numeric ranges)
    #[serde(default)]
    pub pool_snapshot: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    pub winners_count: u32,
    pub allow_repetition: bool,
    #[serde(default)]
    pub rank_all: bool,
    /// The draw result, in draw order
    pub results: Vec<String>,
}

impl HistoryEntry {
    /// Entry for a draw that happened now
    pub fn record(config: &DrawConfig, result: &DrawResult) -> Self {
        Self::recorded_at(config, result, Utc::now())
    }

    /// Entry with an explicit timestamp
    pub fn recorded_at(
        config: &DrawConfig,
        result: &DrawResult,
        created_at: DateTime<Utc>,
    ) -> Self {
        let (pool_snapshot, min, max) = match &config.source {
            PoolSource::List { items } => (items.clone(), None, None),
            PoolSource::NumericRange { min, max } => (Vec::new(), Some(*min), Some(*max)),
        };

        Self {
            id: Uuid::new_v4(),
            created_at,
            source_kind: config.source_kind(),
            pool_snapshot,
            min,
            max,
            winners_count: config.winners_count,
            allow_repetition: config.allow_repetition,
            rank_all: config.rank_all,
            results: result.as_slice().to_vec(),
        }
    }

    /// Draw configuration that repeats this draw
    pub fn to_config(&self) -> DrawConfig {
        let source = match self.source_kind {
            SourceKind::List => PoolSource::list(self.pool_snapshot.iter().cloned()),
            SourceKind::NumericRange => {
                PoolSource::range(self.min.unwrap_or(0), self.max.unwrap_or(0))
            }
        };

        DrawConfig::new(source)
            .with_winners(self.winners_count)
            .with_repetition(self.allow_repetition)
            .with_rank_all(self.rank_all)
    }

    /// Winners the draw asked for; a ranking counts the whole pool
    pub fn drawn_count(&self) -> u64 {
        if self.rank_all {
            match self.source_kind {
                SourceKind::List => self.pool_snapshot.len() as u64,
                SourceKind::NumericRange => self.to_config().pool_size(),
            }
        } else {
            self.to_config().effective_count()
        }
    }

    pub fn result(&self) -> DrawResult {
        DrawResult::new(self.results.clone())
    }

    /// `List (N items)` or `Numbers (min - max)`
    pub fn type_label(&self) -> String {
        match self.source_kind {
            SourceKind::List => format!("List ({} items)", self.pool_snapshot.len()),
            SourceKind::NumericRange => format!(
                "Numbers ({} - {})",
                self.min.unwrap_or_default(),
                self.max.unwrap_or_default()
            ),
        }
    }

    /// First results, then `and N more`
    pub fn results_preview(&self) -> String {
        if self.results.len() > PREVIEW_RESULTS {
            format!(
                "{} and {} more",
                self.results[..PREVIEW_RESULTS].join(", "),
                self.results.len() - PREVIEW_RESULTS
            )
        } else {
            self.results.join(", ")
        }
    }

    /// Relative date as seen from the local clock
    pub fn relative_date(&self) -> String {
        self.relative_date_at(&chrono::Local::now())
    }

    /// Relative date as seen from `now`, rendered in `now`'s timezone
    pub fn relative_date_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let created = self.created_at.with_timezone(&now.timezone());
        let days = now
            .clone()
            .signed_duration_since(created.clone())
            .num_milliseconds()
            .div_euclid(MS_PER_DAY);

        match days {
            ..=0 => format!("Today at {}", created.format("%H:%M")),
            1 => format!("Yesterday at {}", created.format("%H:%M")),
            2..=6 => format!("{days} days ago"),
            _ => created.format("%d %b %Y").to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOG
// ═══════════════════════════════════════════════════════════════════════════════

/// History backed by a key-value store.
///
/// Every change saves the whole list; the cached list only changes once the
/// save succeeded.
pub struct HistoryLog {
    store: Arc<dyn KeyValueStore>,
    entries: RwLock<Vec<HistoryEntry>>,
}

impl HistoryLog {
    /// Load history; missing or unreadable data starts an empty log
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.get(HISTORY_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("history: ignoring unreadable stored history: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("history: failed to load, starting empty: {e}");
                Vec::new()
            }
        };

        Self {
            store,
            entries: RwLock::new(entries),
        }
    }

    /// Record a finished draw as a new entry
    pub fn record(&self, config: &DrawConfig, result: &DrawResult) -> StateResult<HistoryEntry> {
        let entry = HistoryEntry::record(config, result);
        self.append(entry.clone())?;
        Ok(entry)
    }

    /// Insert an entry at the front
    pub fn append(&self, entry: HistoryEntry) -> StateResult<()> {
        let id = entry.id;
        self.update(|entries| entries.insert(0, entry))?;
        log::info!("history: recorded {id}");
        Ok(())
    }

    /// Delete an entry. Returns false if no entry had that id.
    pub fn delete(&self, id: Uuid) -> StateResult<bool> {
        let mut removed = false;
        self.update(|entries| {
            let before = entries.len();
            entries.retain(|e| e.id != id);
            removed = entries.len() != before;
        })?;
        if removed {
            log::info!("history: deleted {id}");
        }
        Ok(removed)
    }

    /// Remove every entry
    pub fn clear(&self) -> StateResult<()> {
        self.update(Vec::clear)?;
        log::info!("history: cleared");
        Ok(())
    }

    pub fn get(&self, id: Uuid) -> Option<HistoryEntry> {
        self.entries.read().iter().find(|e| e.id == id).cloned()
    }

    /// Entries whose id starts with `prefix`, newest first.
    ///
    /// Callers decide what more than one match means; an empty prefix matches
    /// nothing.
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<HistoryEntry> {
        let prefix = prefix.trim().to_ascii_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }
        self.entries
            .read()
            .iter()
            .filter(|e| e.id.to_string().starts_with(&prefix))
            .cloned()
            .collect()
    }

    /// All entries, newest first
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn update(&self, change: impl FnOnce(&mut Vec<HistoryEntry>)) -> StateResult<()> {
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        change(&mut next);

        let json = serde_json::to_string(&next)?;
        if let Err(e) = self.store.set(HISTORY_KEY, &json) {
            log::error!("history: failed to save: {e}");
            return Err(e);
        }

        *entries = next;
        Ok(())
    }
}

impl std::fmt::Debug for HistoryLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryLog")
            .field("entries", &self.entries.read().len())
            .finish_non_exhaustive()
    }
}
