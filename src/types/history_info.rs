use serde::{Deserialize, Serialize};

/// Diagnostic snapshot of a history cursor.
///
/// `current_index` is `None` when no applied operation remains, i.e. the
/// cursor sits before the first entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryInfo {
    pub total_operations: usize,
    pub current_index: Option<usize>,
    pub can_undo: bool,
    pub can_redo: bool,
}
