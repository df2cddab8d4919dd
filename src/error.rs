/// Error taxonomy for stash operations
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StashError {
    /// Referenced group or tab id is no longer present. Benign: trigger
    /// ordering can make this reachable, callers treat it as a no-op.
    #[error("group or tab not found")]
    NotFound,

    /// Import document failed structural validation. Rejected wholesale.
    #[error("invalid import format: {0}")]
    InvalidFormat(String),

    /// Host persistence call failed. Surfaced to the caller, never retried
    /// automatically.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result of a save attempt. An empty filter set is a signal, not an error.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "outcome")]
pub enum SaveOutcome {
    Saved { group_id: String, tab_count: usize },
    NothingToSave,
}

impl SaveOutcome {
    pub fn saved_count(&self) -> usize {
        match self {
            SaveOutcome::Saved { tab_count, .. } => *tab_count,
            SaveOutcome::NothingToSave => 0,
        }
    }
}
