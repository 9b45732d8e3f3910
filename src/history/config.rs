use serde::{Deserialize, Serialize};

// Explicit defaults: no limit unless one is asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of operations kept in the history.
    ///
    /// When exceeded, the oldest entries are evicted and can no longer be
    /// undone. `None` keeps everything.
    pub max_operations: Option<usize>,
}

impl HistoryConfig {
    pub fn unbounded() -> Self {
        Self {
            max_operations: None,
        }
    }

    pub fn with_limit(max_operations: usize) -> Self {
        Self {
            max_operations: Some(max_operations),
        }
    }
}
