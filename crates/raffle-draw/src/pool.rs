//! Candidate list editing and import parsing

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::PoolSource;

/// Split free text into unique, trimmed, non-empty items.
///
/// Separators are commas and newlines. First occurrence wins.
pub fn parse_items(text: &str) -> Vec<String> {
    dedupe(text.split([',', '\n']).map(str::trim))
}

fn dedupe<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| !item.is_empty())
        .filter(|item| seen.insert(*item))
        .map(str::to_string)
        .collect()
}

/// Import file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportFormat {
    /// Comma/newline separated cells, optionally quoted
    Csv,
    /// Plain text, one or more items per line
    Text,
}

impl ImportFormat {
    /// Detect from file name (`.csv` is CSV, everything else is text)
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let is_csv = path
            .as_ref()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv { Self::Csv } else { Self::Text }
    }
}

/// Parse the contents of an imported file
pub fn parse_import(content: &str, format: ImportFormat) -> Vec<String> {
    match format {
        ImportFormat::Text => parse_items(content),
        ImportFormat::Csv => dedupe(
            content
                .split(['\n', ','])
                .map(|cell| strip_quotes(cell.trim()).trim()),
        ),
    }
}

/// Drop one leading and one trailing quote character
fn strip_quotes(cell: &str) -> &str {
    let cell = cell.strip_prefix(['"', '\'']).unwrap_or(cell);
    cell.strip_suffix(['"', '\'']).unwrap_or(cell)
}

/// Ordered set of unique, non-empty candidate names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemList {
    items: Vec<String>,
}

impl ItemList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and merge free text. Returns how many new items were added.
    pub fn add_text(&mut self, text: &str) -> usize {
        self.extend(parse_items(text))
    }

    /// Merge items, skipping empties and duplicates. Returns how many were added.
    pub fn extend<I, S>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.items.len();
        for item in items {
            let item: String = item.into();
            let item = item.trim();
            if !item.is_empty() && !self.contains(item) {
                self.items.push(item.to_string());
            }
        }
        self.items.len() - before
    }

    /// Remove the item at `index`
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|i| i == item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// Snapshot as a draw source
    pub fn to_source(&self) -> PoolSource {
        PoolSource::List {
            items: self.items.clone(),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for ItemList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}
