//! toolrun-core: tool run state for agent chats
//!
//! This crate models the tool invocations of an agent turn, rolls them up
//! into a running/settled summary, and tracks turn state from streamed
//! backend events.

pub mod error;
pub mod events;
pub mod summary;
pub mod sync_status;
pub mod tracker;
pub mod types;

pub use error::{Error, Result};
pub use events::TurnEvent;
pub use summary::{Header, HeaderText, StatusCounts, TurnPhase, TurnSummary, summarize};
pub use sync_status::SyncStatus;
pub use tracker::{ActiveTurn, FinishedTurn, TurnTracker};
pub use types::{AgentTurnState, RelatedDocument, ToolInvocation, ToolStatus};
