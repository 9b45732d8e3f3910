use tracing::debug;

use crate::document::{Document, DocumentError, DocumentStore};
use crate::history::clock::{Clock, SystemClock};
use crate::history::config::HistoryConfig;
use crate::history::operation::{Operation, OperationError};
use crate::types::history_info::HistoryInfo;
use crate::types::identifiers::DocumentId;

/// Owns a document collection and the history of operations applied to it.
///
/// The history is a single sequence with a cursor. Entries before the cursor
/// are applied, in order; entries after it were applied and then undone, in
/// order, and form the redo tail. Executing a new operation drops the redo
/// tail before appending.
///
/// `HistoryManager` is single-threaded and non-reentrant by design.
#[derive(Debug)]
pub struct HistoryManager<C = SystemClock> {
    documents: DocumentStore,
    history: Vec<Operation>,
    // Number of applied entries; the cursor sits right after them.
    applied: usize,
    config: HistoryConfig,
    clock: C,
}

impl HistoryManager<SystemClock> {
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    pub fn with_config(config: HistoryConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for HistoryManager<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> HistoryManager<C> {
    pub fn with_clock(config: HistoryConfig, clock: C) -> Self {
        Self {
            documents: DocumentStore::new(),
            history: Vec::new(),
            applied: 0,
            config,
            clock,
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Insert a document without recording anything in the history.
    pub fn add_document(&mut self, document: Document) -> Result<(), DocumentError> {
        self.documents.insert(document)
    }

    /// Remove a document without recording anything in the history.
    ///
    /// Recorded operations that target the removed id will fail on undo or
    /// redo.
    pub fn remove_document(&mut self, id: &DocumentId) -> Result<Document, DocumentError> {
        self.documents.remove(id)
    }

    pub fn find_document(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Execute `operation` and record it at the cursor.
    ///
    /// On error nothing is recorded and the cursor does not move. A failing
    /// macro may leave its earlier children applied to the collection.
    pub fn execute_command(&mut self, mut operation: Operation) -> Result<(), OperationError> {
        let now = self.clock.now();
        operation.execute(&mut self.documents, now)?;

        if self.applied < self.history.len() {
            debug!(
                discarded = self.history.len() - self.applied,
                "Truncating redo tail"
            );
            self.history.truncate(self.applied);
        }

        debug!(operation = %operation.label(), index = self.history.len(), "Executed operation");
        self.history.push(operation);
        self.applied = self.history.len();

        self.enforce_limit();
        debug_assert!(self.applied <= self.history.len());
        Ok(())
    }

    /// Undo the most recently applied operation.
    ///
    /// Returns `Ok(false)` when there is nothing to undo. On error the cursor
    /// does not move, but a macro may already have undone some of its
    /// children; calling `undo` again resumes with the remaining ones.
    pub fn undo(&mut self) -> Result<bool, OperationError> {
        let Some(index) = self.current_index() else {
            return Ok(false);
        };

        let operation = &mut self.history[index];
        operation.undo(&mut self.documents)?;
        debug!(operation = %operation.label(), index, "Undid operation");

        self.applied = index;
        Ok(true)
    }

    /// Re-apply the first operation of the redo tail.
    ///
    /// Returns `Ok(false)` when there is nothing to redo. On error the cursor
    /// does not move, but a macro may already have re-applied some of its
    /// children; calling `redo` again resumes with the remaining ones.
    pub fn redo(&mut self) -> Result<bool, OperationError> {
        if !self.can_redo() {
            return Ok(false);
        }

        let index = self.applied;
        let now = self.clock.now();
        let operation = &mut self.history[index];
        operation.execute(&mut self.documents, now)?;
        debug!(operation = %operation.label(), index, "Redid operation");

        self.applied = index + 1;
        Ok(true)
    }

    /// Undo up to `count` operations and return how many were undone.
    ///
    /// Stops early at the start of the history. An error aborts the walk;
    /// steps already taken stay taken.
    pub fn undo_many(&mut self, count: usize) -> Result<usize, OperationError> {
        let mut done = 0;
        while done < count && self.undo()? {
            done += 1;
        }
        Ok(done)
    }

    /// Redo up to `count` operations and return how many were redone.
    pub fn redo_many(&mut self, count: usize) -> Result<usize, OperationError> {
        let mut done = 0;
        while done < count && self.redo()? {
            done += 1;
        }
        Ok(done)
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.history.len()
    }

    /// Index of the most recently applied operation, `None` before the first.
    pub fn current_index(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn undo_count(&self) -> usize {
        self.applied
    }

    pub fn redo_count(&self) -> usize {
        self.history.len() - self.applied
    }

    pub fn next_undo_label(&self) -> Option<String> {
        self.current_index().map(|index| self.history[index].label())
    }

    pub fn next_redo_label(&self) -> Option<String> {
        self.history.get(self.applied).map(Operation::label)
    }

    pub fn history_info(&self) -> HistoryInfo {
        HistoryInfo {
            total_operations: self.history.len(),
            current_index: self.current_index(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Forget every recorded operation. Documents are left as they are.
    pub fn clear_history(&mut self) {
        debug!(discarded = self.history.len(), "Clearing history");
        self.history.clear();
        self.applied = 0;
    }

    fn enforce_limit(&mut self) {
        let Some(max) = self.config.max_operations else {
            return;
        };
        if self.history.len() <= max {
            return;
        }

        let excess = self.history.len() - max;
        self.history.drain(..excess);
        self.applied = self.applied.saturating_sub(excess);
        debug!(evicted = excess, max, "Evicted oldest operations");
    }
}
