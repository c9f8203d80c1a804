//! Turn event types

use serde::{Deserialize, Serialize};

use crate::types::{RelatedDocument, ToolStatus};

/// Events streamed by the backend while an agent turn runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    /// A new turn started
    TurnStart {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        turn_id: Option<String>,
    },

    /// Thought text updated (full text so far)
    Thought { text: String },

    /// Tool execution started
    ToolUseStart {
        tool_use_id: String,
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },

    /// Tool execution completed
    ToolResult {
        tool_use_id: String,
        status: ToolStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result_contents: Option<Vec<serde_json::Value>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        related_documents: Option<Vec<RelatedDocument>>,
    },

    /// The turn's message was finalized
    TurnEnd,
}

impl TurnEvent {
    /// Check if this event closes the turn
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnEvent::TurnEnd)
    }

    /// Parse one JSON line
    pub fn from_json(line: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tool_use_start() {
        let event =
            TurnEvent::from_json(r#"{"type":"tool_use_start","tool_use_id":"t1","name":"search","input":{"q":"rust"}}"#)
                .unwrap();
        assert_eq!(
            event,
            TurnEvent::ToolUseStart {
                tool_use_id: "t1".into(),
                name: "search".into(),
                input: json!({"q": "rust"}),
            }
        );
    }

    #[test]
    fn test_parse_tool_result_defaults() {
        let event =
            TurnEvent::from_json(r#"{"type":"tool_result","tool_use_id":"t1","status":"failed"}"#).unwrap();
        match event {
            TurnEvent::ToolResult {
                status,
                result_contents,
                related_documents,
                ..
            } => {
                assert_eq!(status, ToolStatus::Failed);
                assert!(result_contents.is_none());
                assert!(related_documents.is_none());
            }
            other => panic!("expected ToolResult, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        let result =
            TurnEvent::from_json(r#"{"type":"tool_result","tool_use_id":"t1","status":"done"}"#);
        assert!(matches!(result, Err(crate::Error::Json(_))));
    }

    #[test]
    fn test_turn_start_without_id() {
        let event = TurnEvent::from_json(r#"{"type":"turn_start"}"#).unwrap();
        assert_eq!(event, TurnEvent::TurnStart { turn_id: None });
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_turn_end_is_terminal() {
        let event = TurnEvent::from_json(r#"{"type":"turn_end"}"#).unwrap();
        assert!(event.is_terminal());
    }
}
