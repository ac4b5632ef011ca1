//! Engine events broadcast to the presentation layer.

use serde::{Deserialize, Serialize};

use super::FilterSet;

/// Something observable happened in the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "snake_case")]
pub enum EngineEvent {
    /// A fetch sequence started; the aggregate is now empty.
    FetchStarted {
        generation: u64,
        filters: FilterSet,
    },
    /// The current sequence drained every page.
    FetchCompleted {
        generation: u64,
        total: usize,
        truncated: bool,
    },
    /// The current sequence failed.
    FetchFailed { generation: u64, message: String },
    /// A superseded sequence finished and its result was dropped.
    StaleDiscarded { generation: u64 },
    /// Sort or pagination changed; the derived view must be re-read.
    ViewChanged,
}

impl EngineEvent {
    /// Generation the event belongs to, if any.
    pub fn generation(&self) -> Option<u64> {
        match self {
            Self::FetchStarted { generation, .. }
            | Self::FetchCompleted { generation, .. }
            | Self::FetchFailed { generation, .. }
            | Self::StaleDiscarded { generation } => Some(*generation),
            Self::ViewChanged => None,
        }
    }

    /// True for events that end a current sequence.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::FetchCompleted { .. } | Self::FetchFailed { .. })
    }
}
