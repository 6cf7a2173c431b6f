use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

pub const DEFAULT_STACK_SIZE: NonZeroUsize = match NonZeroUsize::new(500) {
    Some(size) => size,
    None => unreachable!(),
};

/// Construction options for a [`History`](crate::history::History).
///
/// ```
/// use canvas_history::config::HistoryConfig;
///
/// let config = HistoryConfig::from_json(r#"{ "stackSize": 20 }"#).unwrap();
/// assert!(config.enabled);
/// assert_eq!(config.stack_size.get(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Whether undo, redo and jump are active.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Maximum number of entries kept on the undo stack.
    #[serde(default = "default_stack_size")]
    pub stack_size: NonZeroUsize,
}

fn default_enabled() -> bool {
    true
}

fn default_stack_size() -> NonZeroUsize {
    DEFAULT_STACK_SIZE
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            stack_size: default_stack_size(),
        }
    }
}

impl HistoryConfig {
    /// Parses a config, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or a `stackSize` of zero.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_stack_size(mut self, stack_size: NonZeroUsize) -> Self {
        self.stack_size = stack_size;
        self
    }
}
