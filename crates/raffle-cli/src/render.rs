//! Terminal rendering of reveal snapshots and history entries

use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use raffle_app::RaffleApp;
use raffle_reveal::{RevealPhase, RevealSequencer, RevealSnapshot, SpinPhase};
use raffle_state::HistoryEntry;

/// Characters of an id shown in listings
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(entry: &HistoryEntry) -> String {
    entry.id.to_string().chars().take(SHORT_ID_LEN).collect()
}

/// Drive a reveal against the wall clock, drawing every snapshot.
///
/// Returns the terminal snapshot, if the reveal reached one.
pub fn play_reveal(
    app: &RaffleApp,
    reveal: &mut RevealSequencer,
    out: &mut impl Write,
) -> io::Result<Option<RevealSnapshot>> {
    let started = Instant::now();
    let mut last = None;

    while let Some(due_ms) = reveal.next_due_ms() {
        let due = Duration::from_millis(due_ms);
        if let Some(wait) = due.checked_sub(started.elapsed()) {
            thread::sleep(wait);
        }

        for frame in reveal.advance_to(due_ms) {
            app.handle_snapshot(&frame);
            render_frame(&frame, out)?;
            last = Some(frame);
        }
    }

    Ok(last.filter(RevealSnapshot::is_revealed))
}

/// One snapshot; spinning frames redraw the current line
pub fn render_frame(frame: &RevealSnapshot, out: &mut impl Write) -> io::Result<()> {
    match frame.phase {
        RevealPhase::Intro => {
            write!(out, "\rDrawing {} winner(s)...", frame.slots.len())?;
        }
        RevealPhase::Spinning => {
            let reels: Vec<String> = frame
                .slots
                .iter()
                .map(|slot| {
                    let value = slot.displayed.as_deref().unwrap_or("...");
                    match slot.spin_phase {
                        SpinPhase::Stopped => format!("[{value}]"),
                        SpinPhase::Spinning | SpinPhase::Slowing => format!(" {value} "),
                    }
                })
                .collect();
            // Clear leftovers from longer previous lines
            write!(out, "\r\x1b[2K{}", reels.join(" "))?;
        }
        RevealPhase::Revealed => {
            writeln!(out, "\r\x1b[2K")?;
            render_winners(frame, out)?;
        }
    }
    out.flush()
}

fn render_winners(frame: &RevealSnapshot, out: &mut impl Write) -> io::Result<()> {
    match frame.slots.len() {
        0 => writeln!(out, "No winners: the pool was empty."),
        1 => writeln!(
            out,
            "🎉 Winner: {}",
            frame.slots[0].displayed.as_deref().unwrap_or_default()
        ),
        _ => {
            writeln!(out, "🎉 Winners:")?;
            for (i, slot) in frame.slots.iter().enumerate() {
                writeln!(
                    out,
                    "  {:>3}. {}",
                    i + 1,
                    slot.displayed.as_deref().unwrap_or_default()
                )?;
            }
            Ok(())
        }
    }
}

/// One-line history listing
pub fn history_line(entry: &HistoryEntry) -> String {
    format!(
        "{}  {:<20}  {:<24}  {}",
        short_id(entry),
        entry.relative_date(),
        entry.type_label(),
        entry.results_preview()
    )
}

/// Full history entry
pub fn history_detail(entry: &HistoryEntry, out: &mut impl Write) -> io::Result<()> {
    let yes_no = |b: bool| if b { "yes" } else { "no" };

    writeln!(out, "Id:          {}", entry.id)?;
    writeln!(out, "Date:        {}", entry.created_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out, "Type:        {}", entry.type_label())?;
    writeln!(out, "Winners:     {}", entry.drawn_count())?;
    writeln!(out, "Repetition:  {}", yes_no(entry.allow_repetition))?;
    writeln!(out, "Ranking:     {}", yes_no(entry.rank_all))?;
    writeln!(out, "Results:")?;
    for (i, result) in entry.results.iter().enumerate() {
        writeln!(out, "  {:>3}. {result}", i + 1)?;
    }
    if !entry.pool_snapshot.is_empty() {
        writeln!(
            out,
            "Participants ({}): {}",
            entry.pool_snapshot.len(),
            entry.pool_snapshot.join(", ")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use raffle_reveal::SlotView;

    fn revealed(values: &[&str]) -> RevealSnapshot {
        RevealSnapshot {
            at_ms: 0,
            phase: RevealPhase::Revealed,
            slots: values
                .iter()
                .map(|v| SlotView {
                    displayed: Some(v.to_string()),
                    spin_phase: SpinPhase::Stopped,
                })
                .collect(),
            stopped: values.len(),
            confetti: Vec::new(),
            cue: None,
        }
    }

    #[test]
    fn test_render_winners() {
        let mut out = Vec::new();
        render_frame(&revealed(&["Ana", "Bruno"]), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1. Ana"));
        assert!(text.contains("2. Bruno"));

        let mut out = Vec::new();
        render_frame(&revealed(&[]), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("pool was empty"));
    }

    #[test]
    fn test_history_detail_counts_ranking() {
        use raffle_draw::{DrawConfig, DrawResult, PoolSource};

        let config = DrawConfig::new(PoolSource::range(1, 3)).with_rank_all(true);
        let entry = HistoryEntry::record(
            &config,
            &DrawResult::new(vec!["2".to_string(), "3".to_string(), "1".to_string()]),
        );

        let mut out = Vec::new();
        history_detail(&entry, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Winners:     3\n"));
        assert!(text.contains("Ranking:     yes"));
    }
}
