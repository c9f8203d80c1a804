//! Turn status rollup
//!
//! [`summarize`] is recomputed from scratch on every redraw. It borrows the
//! turn state and never mutates it.

use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::types::{AgentTurnState, ToolInvocation, ToolStatus};

/// Derived status of a whole turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnPhase {
    /// No tool dispatched yet, or at least one tool still running
    Running,
    /// Every tool finished
    Settled,
}

/// Render description of one turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnSummary<'a> {
    pub phase: TurnPhase,
    pub thought: Option<&'a str>,
    /// Invocations in insertion order
    pub entries: Vec<&'a ToolInvocation>,
}

/// Text shown in the header line of a tool list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderText<'a> {
    /// The agent's narrative
    Thought(&'a str),
    /// Generic progress label, used while running without a thought
    Progress,
}

/// Header line above the tool cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub spinner: bool,
    pub text: HeaderText<'a>,
}

/// Per-status tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub running: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.running + self.succeeded + self.failed
    }
}

/// Summarize a turn: overall phase, thought and ordered entries.
pub fn summarize(state: &AgentTurnState) -> TurnSummary<'_> {
    let entries: Vec<&ToolInvocation> = state.invocations().collect();
    let running = entries.is_empty() || entries.iter().any(|t| t.status.is_running());

    TurnSummary {
        phase: if running {
            TurnPhase::Running
        } else {
            TurnPhase::Settled
        },
        thought: state.thought.as_deref(),
        entries,
    }
}

impl<'a> TurnSummary<'a> {
    pub fn is_running(&self) -> bool {
        self.phase == TurnPhase::Running
    }

    /// Running only because no tool has been dispatched yet
    pub fn awaiting_first_tool(&self) -> bool {
        self.entries.is_empty()
    }

    /// Header line, if one should be shown.
    ///
    /// Present while running or when a non-empty thought exists. The
    /// spinner tracks the running phase.
    pub fn header(&self) -> Option<Header<'a>> {
        let thought = self.thought.filter(|t| !t.is_empty());
        if !self.is_running() && thought.is_none() {
            return None;
        }
        Some(Header {
            spinner: self.is_running(),
            text: thought.map_or(HeaderText::Progress, HeaderText::Thought),
        })
    }

    pub fn counts(&self) -> StatusCounts {
        self.entries
            .iter()
            .fold(StatusCounts::default(), |mut counts, tool| {
                match tool.status {
                    ToolStatus::Running => counts.running += 1,
                    ToolStatus::Succeeded => counts.succeeded += 1,
                    ToolStatus::Failed => counts.failed += 1,
                }
                counts
            })
    }
}

impl Serialize for TurnSummary<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("TurnSummary", 4)?;
        s.serialize_field("phase", &self.phase)?;
        s.serialize_field("is_running", &self.is_running())?;
        s.serialize_field("thought", &self.thought)?;
        s.serialize_field("entries", &self.entries)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool(id: &str, status: ToolStatus) -> ToolInvocation {
        ToolInvocation::new(id, "search", json!({"query": id})).with_status(status)
    }

    fn ids<'a>(summary: &'a TurnSummary<'_>) -> Vec<&'a str> {
        summary.entries.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_empty_state_is_running() {
        let state = AgentTurnState::new();
        let summary = summarize(&state);
        assert!(summary.is_running());
        assert!(summary.entries.is_empty());
        assert!(summary.awaiting_first_tool());
    }

    #[test]
    fn test_single_running_tool() {
        let state = AgentTurnState::new().with_invocation(tool("t1", ToolStatus::Running));
        let summary = summarize(&state);
        assert!(summary.is_running());
        assert_eq!(ids(&summary), vec!["t1"]);
        assert!(!summary.awaiting_first_tool());
    }

    #[test]
    fn test_any_running_keeps_turn_running() {
        let state = AgentTurnState::new()
            .with_invocation(tool("t1", ToolStatus::Succeeded))
            .with_invocation(tool("t2", ToolStatus::Running));
        let summary = summarize(&state);
        assert_eq!(summary.phase, TurnPhase::Running);
        assert_eq!(ids(&summary), vec!["t1", "t2"]);
    }

    #[test]
    fn test_all_terminal_is_settled() {
        let state = AgentTurnState::new()
            .with_invocation(tool("t1", ToolStatus::Succeeded))
            .with_invocation(tool("t2", ToolStatus::Failed));
        let summary = summarize(&state);
        assert_eq!(summary.phase, TurnPhase::Settled);
        assert!(!summary.is_running());
        assert_eq!(ids(&summary), vec!["t1", "t2"]);
    }

    #[test]
    fn test_failed_entries_pass_through() {
        let state = AgentTurnState::new().with_invocation(tool("t1", ToolStatus::Failed));
        let summary = summarize(&state);
        assert_eq!(summary.entries[0].status, ToolStatus::Failed);
        assert!(!summary.is_running());
    }

    #[test]
    fn test_order_is_insertion_not_status_or_name() {
        let state = AgentTurnState::new()
            .with_invocation(tool("z", ToolStatus::Failed))
            .with_invocation(tool("a", ToolStatus::Running))
            .with_invocation(tool("m", ToolStatus::Succeeded));
        let summary = summarize(&state);
        assert_eq!(ids(&summary), vec!["z", "a", "m"]);
        assert_eq!(summary.entries.len(), state.len());
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let state = AgentTurnState::new()
            .with_thought("checking")
            .with_invocation(tool("t1", ToolStatus::Succeeded))
            .with_invocation(tool("t2", ToolStatus::Running));
        assert_eq!(summarize(&state), summarize(&state));
    }

    #[test]
    fn test_thought_passes_through() {
        let state = AgentTurnState::new().with_thought("I should search first");
        assert_eq!(summarize(&state).thought, Some("I should search first"));
    }

    #[test]
    fn test_header_running_without_thought() {
        let state = AgentTurnState::new();
        let header = summarize(&state).header().unwrap();
        assert!(header.spinner);
        assert_eq!(header.text, HeaderText::Progress);
    }

    #[test]
    fn test_header_settled_with_thought() {
        let state = AgentTurnState::new()
            .with_thought("Done searching")
            .with_invocation(tool("t1", ToolStatus::Succeeded));
        let header = summarize(&state).header().unwrap();
        assert!(!header.spinner);
        assert_eq!(header.text, HeaderText::Thought("Done searching"));
    }

    #[test]
    fn test_header_absent_when_settled_without_thought() {
        let state = AgentTurnState::new()
            .with_thought("")
            .with_invocation(tool("t1", ToolStatus::Succeeded));
        assert!(summarize(&state).header().is_none());
    }

    #[test]
    fn test_counts() {
        let state = AgentTurnState::new()
            .with_invocation(tool("t1", ToolStatus::Succeeded))
            .with_invocation(tool("t2", ToolStatus::Failed))
            .with_invocation(tool("t3", ToolStatus::Running))
            .with_invocation(tool("t4", ToolStatus::Succeeded));
        let counts = summarize(&state).counts();
        assert_eq!(
            counts,
            StatusCounts {
                running: 1,
                succeeded: 2,
                failed: 1
            }
        );
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_serialize_summary() {
        let state = AgentTurnState::new()
            .with_invocation(tool("t1", ToolStatus::Succeeded))
            .with_invocation(tool("t2", ToolStatus::Failed));
        let value = serde_json::to_value(summarize(&state)).unwrap();

        assert_eq!(value["phase"], json!("settled"));
        assert_eq!(value["is_running"], json!(false));
        assert_eq!(value["thought"], json!(null));
        assert_eq!(value["entries"][0]["id"], json!("t1"));
        assert_eq!(value["entries"][1]["status"], json!("failed"));
    }
}
