//! Core types for agent tool runs

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Status of a single tool invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Running,
    Succeeded,
    Failed,
}

impl ToolStatus {
    /// Whether the invocation is still executing
    pub fn is_running(&self) -> bool {
        matches!(self, ToolStatus::Running)
    }

    /// Whether the invocation has finished, successfully or not
    pub fn is_terminal(&self) -> bool {
        !self.is_running()
    }

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Running => "running",
            ToolStatus::Succeeded => "succeeded",
            ToolStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A retrieved knowledge chunk a tool result or thought can cite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedDocument {
    /// Retrieved text
    pub chunk_body: String,
    /// Kind of source (e.g. "s3", "url", "youtube")
    pub content_type: String,
    /// Link to the source document
    pub source_link: String,
    /// Retrieval rank, used as the citation number
    pub rank: u32,
}

/// One tool call within an agent turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Invocation id, unique within a turn
    #[serde(default)]
    pub id: String,
    /// Tool name
    pub name: String,
    /// Current status
    pub status: ToolStatus,
    /// Arguments passed to the tool
    #[serde(default)]
    pub input: serde_json::Value,
    /// Result content blocks, once the tool has returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_contents: Option<Vec<serde_json::Value>>,
    /// Documents the tool retrieved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_documents: Option<Vec<RelatedDocument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl ToolInvocation {
    /// Create a running invocation
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: ToolStatus::Running,
            input,
            result_contents: None,
            related_documents: None,
            started_at: None,
            finished_at: None,
        }
    }

    /// Set the status
    pub fn with_status(mut self, status: ToolStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the result contents
    pub fn with_results(mut self, results: Vec<serde_json::Value>) -> Self {
        self.result_contents = Some(results);
        self
    }

    /// Set the related documents
    pub fn with_related_documents(mut self, documents: Vec<RelatedDocument>) -> Self {
        self.related_documents = Some(documents);
        self
    }

    /// Wall time between start and finish, when both are known
    pub fn elapsed(&self) -> Option<Duration> {
        let (start, end) = (self.started_at?, self.finished_at?);
        (end - start).to_std().ok()
    }

    /// Number of related documents (zero when absent)
    pub fn related_count(&self) -> usize {
        self.related_documents.as_ref().map_or(0, Vec::len)
    }

    /// Result contents flattened to text.
    ///
    /// Strings are taken as-is, objects contribute their `text` field and
    /// anything else is rendered as compact JSON.
    pub fn result_text(&self) -> Option<String> {
        let contents = self.result_contents.as_ref()?;
        let parts: Vec<String> = contents
            .iter()
            .map(|value| match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Object(map) => match map.get("text") {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    _ => value.to_string(),
                },
                other => other.to_string(),
            })
            .collect();
        Some(parts.join("\n"))
    }
}

/// Tool invocations of one agent turn plus the agent's thought.
///
/// Lookup is by invocation id; iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTurnState")]
pub struct AgentTurnState {
    pub tools: IndexMap<String, ToolInvocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
}

#[derive(Deserialize)]
struct RawTurnState {
    #[serde(default)]
    tools: IndexMap<String, ToolInvocation>,
    #[serde(default)]
    thought: Option<String>,
}

impl From<RawTurnState> for AgentTurnState {
    fn from(raw: RawTurnState) -> Self {
        // The mapping key is the canonical id
        let tools = raw
            .tools
            .into_iter()
            .map(|(id, mut invocation)| {
                invocation.id.clone_from(&id);
                (id, invocation)
            })
            .collect();
        Self {
            tools,
            thought: raw.thought,
        }
    }
}

impl AgentTurnState {
    /// Empty state for a turn that just began
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the thought
    pub fn with_thought(mut self, thought: impl Into<String>) -> Self {
        self.thought = Some(thought.into());
        self
    }

    /// Add an invocation (builder form of [`insert`](Self::insert))
    pub fn with_invocation(mut self, invocation: ToolInvocation) -> Self {
        self.insert(invocation);
        self
    }

    /// Insert an invocation keyed by its id.
    ///
    /// An existing entry with the same id is replaced in place and returned.
    pub fn insert(&mut self, invocation: ToolInvocation) -> Option<ToolInvocation> {
        self.tools.insert(invocation.id.clone(), invocation)
    }

    pub fn get(&self, id: &str) -> Option<&ToolInvocation> {
        self.tools.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ToolInvocation> {
        self.tools.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invocations in insertion order
    pub fn invocations(&self) -> impl Iterator<Item = &ToolInvocation> {
        self.tools.values()
    }

    /// Related documents of every invocation, in invocation order
    pub fn related_documents(&self) -> Vec<RelatedDocument> {
        self.invocations()
            .filter_map(|tool| tool.related_documents.as_ref())
            .flatten()
            .cloned()
            .collect()
    }
}
