//! Share and export rendering for history entries

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use raffle_draw::SourceKind;
use serde::{Deserialize, Serialize};

use crate::history::HistoryEntry;

/// Export output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Plain share message
    #[default]
    Text,
    /// Standalone HTML report
    Html,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Html => "html",
        }
    }

    pub fn render(&self, entry: &HistoryEntry) -> String {
        match self {
            Self::Text => share_message(entry),
            Self::Html => html_report(entry),
        }
    }
}

fn full_date(at: &DateTime<Utc>) -> String {
    at.format("%d %B %Y, %H:%M UTC").to_string()
}

fn winners_label(entry: &HistoryEntry) -> &'static str {
    if entry.results.len() > 1 { "Winners" } else { "Winner" }
}

fn source_summary(entry: &HistoryEntry) -> String {
    match entry.source_kind {
        SourceKind::List => format!("List with {} items", entry.pool_snapshot.len()),
        SourceKind::NumericRange => format!(
            "Numbers from {} to {}",
            entry.min.unwrap_or_default(),
            entry.max.unwrap_or_default()
        ),
    }
}

/// Plain-text message for the platform share sheet
pub fn share_message(entry: &HistoryEntry) -> String {
    format!(
        "Draw Result\n\n{}\n\n{}: {}\n\nDrawn on: {}",
        source_summary(entry),
        winners_label(entry),
        entry.results.join(", "),
        full_date(&entry.created_at)
    )
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const REPORT_STYLE: &str = "\
body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; padding: 40px; color: #111827; }
h1 { color: #2563EB; margin-bottom: 8px; }
h2 { color: #6B7280; font-weight: normal; font-size: 16px; margin-bottom: 32px; }
.section { margin-bottom: 24px; }
.section-title { font-size: 12px; color: #6B7280; text-transform: uppercase; letter-spacing: 0.5px; margin-bottom: 8px; }
.winner { background: #F59E0B15; border-left: 4px solid #F59E0B; padding: 12px 16px; margin-bottom: 8px; font-size: 18px; font-weight: 600; }
.config-item { display: flex; justify-content: space-between; padding: 8px 0; border-bottom: 1px solid #E5E7EB; }
.items-list { display: flex; flex-wrap: wrap; gap: 8px; }
.item { background: #F3F4F6; padding: 4px 12px; border-radius: 16px; font-size: 14px; }";

/// Printable HTML report. All user-supplied text is escaped.
pub fn html_report(entry: &HistoryEntry) -> String {
    let yes_no = |b: bool| if b { "Yes" } else { "No" };
    let mut html = String::new();

    // Writing into a String never fails
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Draw Result</title>\n\
         <style>\n{REPORT_STYLE}\n</style>\n</head>\n<body>\n\
         <h1>Draw Result</h1>\n<h2>{}</h2>\n",
        full_date(&entry.created_at)
    );

    let _ = writeln!(
        html,
        "<div class=\"section\">\n<div class=\"section-title\">{}</div>",
        winners_label(entry)
    );
    for (i, result) in entry.results.iter().enumerate() {
        let _ = writeln!(
            html,
            "<div class=\"winner\">{}. {}</div>",
            i + 1,
            escape_html(result)
        );
    }
    html.push_str("</div>\n");

    let mut config: Vec<(&str, String)> =
        vec![("Type", entry.source_kind.display_name().to_string())];
    if entry.source_kind == SourceKind::NumericRange {
        config.push((
            "Range",
            format!(
                "{} - {}",
                entry.min.unwrap_or_default(),
                entry.max.unwrap_or_default()
            ),
        ));
    }
    config.push(("Number of winners", entry.drawn_count().to_string()));
    config.push(("Repetition allowed", yes_no(entry.allow_repetition).to_string()));
    config.push(("Full ranking", yes_no(entry.rank_all).to_string()));

    html.push_str("<div class=\"section\">\n<div class=\"section-title\">Settings</div>\n");
    for (label, value) in &config {
        let _ = writeln!(
            html,
            "<div class=\"config-item\"><span>{label}</span><span>{}</span></div>",
            escape_html(value)
        );
    }
    html.push_str("</div>\n");

    if entry.source_kind == SourceKind::List && !entry.pool_snapshot.is_empty() {
        let _ = writeln!(
            html,
            "<div class=\"section\">\n<div class=\"section-title\">Participants ({})</div>\n<div class=\"items-list\">",
            entry.pool_snapshot.len()
        );
        for item in &entry.pool_snapshot {
            let _ = writeln!(html, "<span class=\"item\">{}</span>", escape_html(item));
        }
        html.push_str("</div>\n</div>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use raffle_draw::{DrawConfig, DrawResult, PoolSource};

    fn entry(config: DrawConfig, results: &[&str]) -> HistoryEntry {
        HistoryEntry::record(
            &config,
            &DrawResult::new(results.iter().map(|s| s.to_string()).collect()),
        )
    }

    #[test]
    fn test_share_message() {
        let e = entry(
            DrawConfig::new(PoolSource::list(["Ana", "Bruno", "Carla"])).with_winners(2),
            &["Carla", "Ana"],
        );
        let msg = share_message(&e);
        assert!(msg.starts_with("Draw Result\n\nList with 3 items\n\n"));
        assert!(msg.contains("Winners: Carla, Ana"));
        assert!(msg.contains("Drawn on: "));

        let e = entry(DrawConfig::new(PoolSource::range(1, 10)), &["7"]);
        let msg = share_message(&e);
        assert!(msg.contains("Numbers from 1 to 10"));
        assert!(msg.contains("Winner: 7"));
    }

    #[test]
    fn test_html_escapes_user_text() {
        let e = entry(
            DrawConfig::new(PoolSource::list(["<script>alert(1)</script>", "Tom & Jerry"])),
            &["Tom & Jerry"],
        );
        let html = html_report(&e);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("<div class=\"winner\">1. Tom &amp; Jerry</div>"));
        assert!(html.contains("Participants (2)"));
    }

    #[test]
    fn test_html_range_section() {
        let e = entry(
            DrawConfig::new(PoolSource::range(5, 50))
                .with_winners(2)
                .with_repetition(true),
            &["12", "12"],
        );
        let html = html_report(&e);
        assert!(html.contains("<span>Range</span><span>5 - 50</span>"));
        assert!(html.contains("<span>Repetition allowed</span><span>Yes</span>"));
        assert!(!html.contains("Participants"));
        assert_eq!(ExportFormat::Html.extension(), "html");
    }

    #[test]
    fn test_html_ranking_counts_whole_pool() {
        let e = entry(
            DrawConfig::new(PoolSource::list(["Ana", "Bruno", "Carla", "Duda"]))
                .with_rank_all(true),
            &["Duda", "Ana", "Carla", "Bruno"],
        );
        let html = html_report(&e);
        assert!(html.contains("<span>Number of winners</span><span>4</span>"));
        assert!(html.contains("<span>Full ranking</span><span>Yes</span>"));
    }
}
