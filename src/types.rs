//! Lifecycle types shared by the stream runtime and its stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a pipeline stage.
///
/// A stage moves strictly forward: `Created -> Activated -> ShuttingDown -> Closed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    /// Constructed, not yet started.
    Created,
    /// Started; accepting input.
    Activated,
    /// Shutdown callback in progress.
    ShuttingDown,
    /// Terminal.
    Closed,
}

impl StageState {
    /// Whether the stage accepts input in this state.
    pub fn accepts_input(self) -> bool {
        self == StageState::Activated
    }

    /// Whether the stage has reached (or is on its way to) the terminal state.
    pub fn is_shut_down(self) -> bool {
        matches!(self, StageState::ShuttingDown | StageState::Closed)
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageState::Created => "created",
            StageState::Activated => "activated",
            StageState::ShuttingDown => "shutting_down",
            StageState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Why a stream was shut down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownReason {
    /// Input ended normally.
    Completed,
    /// The upstream source failed.
    UpstreamError,
    /// A stage callback failed.
    Errored,
    /// The consumer stopped reading (explicit cancel or drop).
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_activated_accepts_input() {
        assert!(!StageState::Created.accepts_input());
        assert!(StageState::Activated.accepts_input());
        assert!(!StageState::ShuttingDown.accepts_input());
        assert!(!StageState::Closed.accepts_input());
    }

    #[test]
    fn test_shut_down_states() {
        assert!(!StageState::Created.is_shut_down());
        assert!(!StageState::Activated.is_shut_down());
        assert!(StageState::ShuttingDown.is_shut_down());
        assert!(StageState::Closed.is_shut_down());
    }

    #[test]
    fn test_display_matches_serde_names() {
        assert_eq!(StageState::ShuttingDown.to_string(), "shutting_down");
        assert_eq!(StageState::Closed.to_string(), "closed");
    }
}
