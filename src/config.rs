//! Stream configuration.

use serde::{Deserialize, Serialize};

/// Stream configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Name used in log output.
    pub name: String,

    /// Number of queued outputs the piped reader tries to hold before it
    /// stops pulling upstream input. Values below 1 are treated as 1.
    /// Default: 1
    pub read_ahead: usize,
}

impl StreamConfig {
    /// Create a config with the given name and default settings.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Effective read-ahead, never zero.
    pub(crate) fn effective_read_ahead(&self) -> usize {
        self.read_ahead.max(1)
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            name: "stream".to_string(),
            read_ahead: 1,
        }
    }
}
