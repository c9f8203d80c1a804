//! Event log loading and plain-text replay

use anyhow::Context;
use std::io::Write;
use std::path::Path;
use toolrun_core::{FinishedTurn, TurnEvent, TurnSummary, TurnTracker};
use toolrun_tui::{Theme, widgets::ToolList};

/// Options for the text replay
pub struct ReplayOptions<'a> {
    pub json: bool,
    pub theme: Theme,
    pub width: usize,
    pub result_preview: usize,
    pub progress_label: &'a str,
}

/// Read a JSONL event log. Blank lines are skipped.
pub fn load_events(path: &Path) -> anyhow::Result<Vec<TurnEvent>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_events(&content).with_context(|| format!("Invalid event log {}", path.display()))
}

pub fn parse_events(content: &str) -> anyhow::Result<Vec<TurnEvent>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            TurnEvent::from_json(line).with_context(|| format!("line {}", i + 1))
        })
        .collect()
}

/// Apply `events` in order, writing one line per event and the summary of
/// every finished turn.
pub fn replay<W: Write>(
    events: Vec<TurnEvent>,
    options: &ReplayOptions<'_>,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut tracker = TurnTracker::new();

    for (i, event) in events.into_iter().enumerate() {
        if !options.json {
            writeln!(out, "{}", describe(&event))?;
        }
        let finished = tracker
            .apply(event)
            .with_context(|| format!("event {}", i + 1))?;

        if let Some(turn) = finished {
            if options.json {
                write_json(&turn, out)?;
            } else {
                write_text(&turn, options, out)?;
            }
        }
    }

    if let Some(active) = tracker.active() {
        tracing::warn!("Event log ended inside turn {}", active.turn_id);
    }
    Ok(())
}

fn write_json<W: Write>(turn: &FinishedTurn, out: &mut W) -> anyhow::Result<()> {
    let line = serde_json::json!({
        "turn_id": turn.turn_id,
        "summary": turn.summary(),
    });
    writeln!(out, "{}", line)?;
    Ok(())
}

fn write_text<W: Write>(
    turn: &FinishedTurn,
    options: &ReplayOptions<'_>,
    out: &mut W,
) -> anyhow::Result<()> {
    let summary = turn.summary();
    let documents = turn.state.related_documents();
    writeln!(out, "[turn {} {}]", turn.turn_id, status_line(&summary))?;
    let list = ToolList::new(&summary, &options.theme)
        .related_documents(&documents)
        .progress_label(options.progress_label)
        .result_preview(options.result_preview);
    for line in list.lines(options.width.saturating_sub(2)) {
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        writeln!(out, "  {}", text.trim_end())?;
    }
    Ok(())
}

/// "settled: 2 succeeded, 1 failed"
pub fn status_line(summary: &TurnSummary<'_>) -> String {
    let counts = summary.counts();
    let phase = if summary.is_running() {
        "running"
    } else {
        "settled"
    };
    if counts.total() == 0 {
        return format!("{}: no tools", phase);
    }
    let mut parts = Vec::new();
    if counts.running > 0 {
        parts.push(format!("{} running", counts.running));
    }
    if counts.succeeded > 0 {
        parts.push(format!("{} succeeded", counts.succeeded));
    }
    if counts.failed > 0 {
        parts.push(format!("{} failed", counts.failed));
    }
    format!("{}: {}", phase, parts.join(", "))
}

/// One-line description of an event
pub fn describe(event: &TurnEvent) -> String {
    match event {
        TurnEvent::TurnStart { turn_id: Some(id) } => format!("[turn {} started]", id),
        TurnEvent::TurnStart { turn_id: None } => "[turn started]".to_string(),
        TurnEvent::Thought { text } => {
            format!("[thought] {}", toolrun_tui::widgets::truncate_chars(text, 120))
        }
        TurnEvent::ToolUseStart { name, input, .. } => {
            format!("[Running {}...] {}", name, input)
        }
        TurnEvent::ToolResult {
            tool_use_id,
            status,
            ..
        } => format!("[{} {}]", tool_use_id, status),
        TurnEvent::TurnEnd => "[turn ended]".to_string(),
    }
}
