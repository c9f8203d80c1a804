//! Turn state loading and JSON summary output

use anyhow::Context;
use std::io::Write;
use std::path::Path;
use toolrun_core::{AgentTurnState, summarize};

/// Read an `AgentTurnState` JSON document
pub fn load_state(path: &Path) -> anyhow::Result<AgentTurnState> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let state: AgentTurnState = serde_json::from_str(&content)
        .with_context(|| format!("Invalid turn state in {}", path.display()))?;
    tracing::debug!("Loaded {} tool invocations", state.len());
    Ok(state)
}

/// Write the summary of `state` as one JSON document
pub fn write_summary<W: Write>(
    state: &AgentTurnState,
    pretty: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let summary = summarize(state);
    if pretty {
        serde_json::to_writer_pretty(&mut *out, &summary)?;
    } else {
        serde_json::to_writer(&mut *out, &summary)?;
    }
    writeln!(out)?;
    Ok(())
}
