//! Knowledge sync status of a bot

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// State of a bot's knowledge ingestion job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl SyncStatus {
    /// Queued and running jobs show a spinner
    pub fn is_in_progress(&self) -> bool {
        matches!(self, SyncStatus::Queued | SyncStatus::Running)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SyncStatus::Failed)
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            SyncStatus::Queued => "Queued",
            SyncStatus::Running => "Running",
            SyncStatus::Succeeded => "Succeeded",
            SyncStatus::Failed => "Failed",
        }
    }

    /// Static icon for finished jobs; in-progress jobs animate instead
    pub fn indicator(&self) -> Option<char> {
        match self {
            SyncStatus::Queued | SyncStatus::Running => None,
            SyncStatus::Succeeded => Some('✓'),
            SyncStatus::Failed => Some('✗'),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Queued => "QUEUED",
            SyncStatus::Running => "RUNNING",
            SyncStatus::Succeeded => "SUCCEEDED",
            SyncStatus::Failed => "FAILED",
        }
    }
}

impl FromStr for SyncStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QUEUED" => Ok(SyncStatus::Queued),
            "RUNNING" => Ok(SyncStatus::Running),
            "SUCCEEDED" => Ok(SyncStatus::Succeeded),
            "FAILED" => Ok(SyncStatus::Failed),
            _ => Err(Error::InvalidSyncStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
