//! Error types for toolrun-core

use thiserror::Error;

/// Result type alias using toolrun-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while tracking a turn
#[derive(Error, Debug)]
pub enum Error {
    /// A turn event arrived before any `turn_start`
    #[error("No active turn")]
    NoActiveTurn,

    /// A result referenced a tool use that was never started
    #[error("Unknown tool use: {0}")]
    UnknownToolUse(String),

    /// A result carried a non-terminal status
    #[error("Tool result for {0} must be succeeded or failed")]
    NonTerminalResult(String),

    /// A sync status string did not match any known status
    #[error("Invalid sync status: {0}")]
    InvalidSyncStatus(String),

    /// Malformed event or state document
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error comes from the event ordering rather than the payload
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Error::NoActiveTurn | Error::UnknownToolUse(_) | Error::NonTerminalResult(_)
        )
    }
}
