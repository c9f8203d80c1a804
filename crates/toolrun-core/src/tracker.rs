//! Incremental turn state built from [`TurnEvent`]s.

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::events::TurnEvent;
use crate::summary::{TurnSummary, summarize};
use crate::types::{AgentTurnState, ToolInvocation};

/// The turn currently being tracked
#[derive(Debug, Clone)]
pub struct ActiveTurn {
    pub turn_id: String,
    pub state: AgentTurnState,
}

/// A turn handed back by `turn_end`
#[derive(Debug, Clone)]
pub struct FinishedTurn {
    pub turn_id: String,
    pub state: AgentTurnState,
}

impl FinishedTurn {
    pub fn summary(&self) -> TurnSummary<'_> {
        summarize(&self.state)
    }
}

/// Owns the state of at most one agent turn.
#[derive(Debug, Default)]
pub struct TurnTracker {
    active: Option<ActiveTurn>,
}

impl TurnTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a turn, discarding any unfinished one
    pub fn begin(&mut self, turn_id: Option<String>) -> &ActiveTurn {
        if let Some(previous) = &self.active {
            warn!(
                "Turn {} discarded before turn_end ({} tools)",
                previous.turn_id,
                previous.state.len()
            );
        }
        let turn_id = turn_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        debug!("Turn {} started", turn_id);
        self.active.insert(ActiveTurn {
            turn_id,
            state: AgentTurnState::new(),
        })
    }

    pub fn active(&self) -> Option<&ActiveTurn> {
        self.active.as_ref()
    }

    pub fn state(&self) -> Option<&AgentTurnState> {
        self.active.as_ref().map(|turn| &turn.state)
    }

    /// Summary of the active turn
    pub fn summary(&self) -> Option<TurnSummary<'_>> {
        self.state().map(summarize)
    }

    /// Drop the active turn without finishing it (e.g. the view went away)
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Apply one event.
    ///
    /// Returns the finished turn when the event is `turn_end`.
    pub fn apply(&mut self, event: TurnEvent) -> Result<Option<FinishedTurn>> {
        match event {
            TurnEvent::TurnStart { turn_id } => {
                self.begin(turn_id);
            }
            TurnEvent::Thought { text } => {
                self.state_mut()?.thought = Some(text);
            }
            TurnEvent::ToolUseStart {
                tool_use_id,
                name,
                input,
            } => {
                let mut invocation = ToolInvocation::new(tool_use_id, name, input);
                invocation.started_at = Some(Utc::now());
                debug!("Tool {} ({}) started", invocation.id, invocation.name);
                if let Some(previous) = self.state_mut()?.insert(invocation) {
                    warn!("Tool use {} started twice, replacing entry", previous.id);
                }
            }
            TurnEvent::ToolResult {
                tool_use_id,
                status,
                result_contents,
                related_documents,
            } => {
                let state = self.state_mut()?;
                if status.is_running() {
                    return Err(Error::NonTerminalResult(tool_use_id));
                }
                let Some(invocation) = state.get_mut(&tool_use_id) else {
                    return Err(Error::UnknownToolUse(tool_use_id));
                };
                invocation.status = status;
                invocation.finished_at = Some(Utc::now());
                if result_contents.is_some() {
                    invocation.result_contents = result_contents;
                }
                if related_documents.is_some() {
                    invocation.related_documents = related_documents;
                }
                debug!("Tool {} {}", tool_use_id, status);
            }
            TurnEvent::TurnEnd => {
                let ActiveTurn { turn_id, state } = self.active.take().ok_or(Error::NoActiveTurn)?;
                debug!("Turn {} finished with {} tools", turn_id, state.len());
                return Ok(Some(FinishedTurn { turn_id, state }));
            }
        }
        Ok(None)
    }

    fn state_mut(&mut self) -> Result<&mut AgentTurnState> {
        self.active
            .as_mut()
            .map(|turn| &mut turn.state)
            .ok_or(Error::NoActiveTurn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::TurnPhase;
    use crate::types::ToolStatus;
    use serde_json::json;

    fn start(id: &str, name: &str) -> TurnEvent {
        TurnEvent::ToolUseStart {
            tool_use_id: id.into(),
            name: name.into(),
            input: json!({}),
        }
    }

    fn result(id: &str, status: ToolStatus) -> TurnEvent {
        TurnEvent::ToolResult {
            tool_use_id: id.into(),
            status,
            result_contents: Some(vec![json!({"text": "ok"})]),
            related_documents: None,
        }
    }

    fn begun() -> TurnTracker {
        let mut tracker = TurnTracker::new();
        tracker
            .apply(TurnEvent::TurnStart {
                turn_id: Some("turn-1".into()),
            })
            .unwrap();
        tracker
    }

    #[test]
    fn test_new_turn_is_empty_and_running() {
        let tracker = begun();
        let summary = tracker.summary().unwrap();
        assert!(summary.is_running());
        assert!(summary.entries.is_empty());
        assert_eq!(tracker.active().unwrap().turn_id, "turn-1");
    }

    #[test]
    fn test_generated_turn_id() {
        let mut tracker = TurnTracker::new();
        tracker.apply(TurnEvent::TurnStart { turn_id: None }).unwrap();
        assert!(!tracker.active().unwrap().turn_id.is_empty());
    }

    #[test]
    fn test_full_lifecycle() {
        let mut tracker = begun();
        tracker
            .apply(TurnEvent::Thought {
                text: "Search first".into(),
            })
            .unwrap();
        tracker.apply(start("t1", "search")).unwrap();
        tracker.apply(start("t2", "calculator")).unwrap();
        tracker.apply(result("t2", ToolStatus::Failed)).unwrap();

        {
            let summary = tracker.summary().unwrap();
            assert_eq!(summary.phase, TurnPhase::Running);
            assert_eq!(summary.thought, Some("Search first"));
        }

        tracker.apply(result("t1", ToolStatus::Succeeded)).unwrap();
        assert_eq!(tracker.summary().unwrap().phase, TurnPhase::Settled);

        let finished = tracker.apply(TurnEvent::TurnEnd).unwrap().unwrap();
        assert_eq!(finished.turn_id, "turn-1");
        let summary = finished.summary();
        let ids: Vec<&str> = summary.entries.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
        assert!(tracker.active().is_none());
    }

    #[test]
    fn test_result_records_contents_and_times() {
        let mut tracker = begun();
        tracker.apply(start("t1", "search")).unwrap();
        tracker.apply(result("t1", ToolStatus::Succeeded)).unwrap();

        let tool = tracker.state().unwrap().get("t1").unwrap();
        assert_eq!(tool.result_text().as_deref(), Some("ok"));
        assert!(tool.started_at.is_some());
        assert!(tool.finished_at.is_some());
        assert!(tool.elapsed().is_some());
    }

    #[test]
    fn test_duplicate_start_replaces_in_place() {
        let mut tracker = begun();
        tracker.apply(start("t1", "search")).unwrap();
        tracker.apply(start("t2", "fetch")).unwrap();
        tracker.apply(start("t1", "search_again")).unwrap();

        let state = tracker.state().unwrap();
        assert_eq!(state.len(), 2);
        let names: Vec<&str> = state.invocations().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["search_again", "fetch"]);
    }

    #[test]
    fn test_unknown_tool_result() {
        let mut tracker = begun();
        let err = tracker.apply(result("nope", ToolStatus::Succeeded)).unwrap_err();
        assert!(matches!(err, Error::UnknownToolUse(id) if id == "nope"));
    }

    #[test]
    fn test_running_result_rejected() {
        let mut tracker = begun();
        tracker.apply(start("t1", "search")).unwrap();
        let err = tracker.apply(result("t1", ToolStatus::Running)).unwrap_err();
        assert!(matches!(err, Error::NonTerminalResult(_)));
        assert_eq!(
            tracker.state().unwrap().get("t1").unwrap().status,
            ToolStatus::Running
        );
    }

    #[test]
    fn test_events_without_turn() {
        let mut tracker = TurnTracker::new();
        assert!(matches!(
            tracker.apply(start("t1", "search")),
            Err(Error::NoActiveTurn)
        ));
        assert!(matches!(
            tracker.apply(TurnEvent::TurnEnd),
            Err(Error::NoActiveTurn)
        ));
        assert!(matches!(
            tracker.apply(result("t1", ToolStatus::Running)),
            Err(Error::NoActiveTurn)
        ));
        assert!(tracker.summary().is_none());
    }

    #[test]
    fn test_turn_start_discards_previous() {
        let mut tracker = begun();
        tracker.apply(start("t1", "search")).unwrap();
        tracker
            .apply(TurnEvent::TurnStart {
                turn_id: Some("turn-2".into()),
            })
            .unwrap();
        assert_eq!(tracker.active().unwrap().turn_id, "turn-2");
        assert!(tracker.state().unwrap().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut tracker = begun();
        tracker.reset();
        assert!(tracker.active().is_none());
    }
}
