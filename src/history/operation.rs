//! Reversible operations over a [`DocumentStore`].
//!
//! Every variant follows the same lifecycle:
//!
//! ```txt
//! Unexecuted --execute--> Executed --undo--> Undone --execute--> Executed ...
//! ```
//!
//! Undoing an operation that is not `Executed` fails with
//! [`OperationError::NotExecuted`]; executing one that already is fails with
//! [`OperationError::AlreadyExecuted`].
//!
//! # State capture
//! Edit and Delete record what they need for undo when they *execute*, never
//! when they are constructed. An operation may be built long before it runs,
//! and other operations may change the target in between; the captured state
//! is always the one present right before the forward action.
//!
//! # Macros
//! A macro executes its children in order and undoes them in reverse order.
//! If a child fails, the children before it keep their new state and the
//! error is returned. No compensating rollback is attempted. The macro itself
//! keeps its previous state, so the same call can be retried: execute skips
//! children that are already `Executed` and undo skips children that are not.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::document::{Document, DocumentError, DocumentStore};
use crate::types::identifiers::DocumentId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("Cannot undo `{0}`: operation is not executed")]
    NotExecuted(String),
    #[error("Cannot execute `{0}`: operation is already executed")]
    AlreadyExecuted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Unexecuted,
    Executed,
    Undone,
}

/// A reversible unit of work.
#[derive(Debug, Clone)]
pub enum Operation {
    Create(CreateOperation),
    Edit(EditOperation),
    Delete(DeleteOperation),
    Macro(MacroOperation),
}

impl Operation {
    pub fn create(
        id: impl Into<DocumentId>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Operation::Create(CreateOperation {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            state: OperationState::Unexecuted,
        })
    }

    pub fn edit(id: impl Into<DocumentId>, new_content: impl Into<String>) -> Self {
        Operation::Edit(EditOperation {
            id: id.into(),
            new_content: new_content.into(),
            previous: None,
            state: OperationState::Unexecuted,
        })
    }

    pub fn delete(id: impl Into<DocumentId>) -> Self {
        Operation::Delete(DeleteOperation {
            id: id.into(),
            removed: None,
            state: OperationState::Unexecuted,
        })
    }

    /// Group operations into a single macro, executed in the given order.
    pub fn group(children: impl IntoIterator<Item = Operation>) -> Self {
        Operation::Macro(MacroOperation {
            children: children.into_iter().collect(),
            state: OperationState::Unexecuted,
        })
    }

    pub fn state(&self) -> OperationState {
        match self {
            Operation::Create(op) => op.state,
            Operation::Edit(op) => op.state,
            Operation::Delete(op) => op.state,
            Operation::Macro(op) => op.state,
        }
    }

    /// Short human-readable description, e.g. `edit notes`.
    pub fn label(&self) -> String {
        match self {
            Operation::Create(op) => format!("create {}", op.id),
            Operation::Edit(op) => format!("edit {}", op.id),
            Operation::Delete(op) => format!("delete {}", op.id),
            Operation::Macro(op) => {
                let children: Vec<String> = op.children.iter().map(Operation::label).collect();
                format!("macro[{}]", children.join(", "))
            }
        }
    }

    /// Perform the forward action against `documents`.
    ///
    /// `now` is stamped onto every document the operation creates or edits.
    pub fn execute(
        &mut self,
        documents: &mut DocumentStore,
        now: DateTime<Utc>,
    ) -> Result<(), OperationError> {
        if self.state() == OperationState::Executed {
            return Err(OperationError::AlreadyExecuted(self.label()));
        }

        match self {
            Operation::Create(op) => op.execute(documents, now)?,
            Operation::Edit(op) => op.execute(documents, now)?,
            Operation::Delete(op) => op.execute(documents)?,
            Operation::Macro(op) => op.execute(documents, now)?,
        }

        debug_assert_eq!(self.state(), OperationState::Executed);
        Ok(())
    }

    /// Reverse the last [`execute`](Self::execute).
    pub fn undo(&mut self, documents: &mut DocumentStore) -> Result<(), OperationError> {
        if self.state() != OperationState::Executed {
            return Err(OperationError::NotExecuted(self.label()));
        }

        match self {
            Operation::Create(op) => op.undo(documents)?,
            Operation::Edit(op) => op.undo(documents)?,
            Operation::Delete(op) => op.undo(documents)?,
            Operation::Macro(op) => op.undo(documents)?,
        }

        debug_assert_eq!(self.state(), OperationState::Undone);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CreateOperation {
    id: DocumentId,
    title: String,
    content: String,
    state: OperationState,
}

impl CreateOperation {
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    fn execute(
        &mut self,
        documents: &mut DocumentStore,
        now: DateTime<Utc>,
    ) -> Result<(), OperationError> {
        let document = Document::new(self.id.clone(), self.title.clone(), self.content.clone(), now);
        documents.insert(document)?;
        self.state = OperationState::Executed;
        Ok(())
    }

    fn undo(&mut self, documents: &mut DocumentStore) -> Result<(), OperationError> {
        documents.remove(&self.id)?;
        self.state = OperationState::Undone;
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct PreviousContent {
    content: String,
    modified_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct EditOperation {
    id: DocumentId,
    new_content: String,
    // Captured on execute, released on undo.
    previous: Option<PreviousContent>,
    state: OperationState,
}

impl EditOperation {
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Content the document held right before the last execute, if executed.
    pub fn previous_content(&self) -> Option<&str> {
        self.previous.as_ref().map(|p| p.content.as_str())
    }

    fn execute(
        &mut self,
        documents: &mut DocumentStore,
        now: DateTime<Utc>,
    ) -> Result<(), OperationError> {
        let document = documents.get_mut(&self.id)?;
        let modified_at = document.modified_at;
        let content = document.update_content(self.new_content.clone(), now);

        self.previous = Some(PreviousContent {
            content,
            modified_at,
        });
        self.state = OperationState::Executed;
        Ok(())
    }

    fn undo(&mut self, documents: &mut DocumentStore) -> Result<(), OperationError> {
        let document = documents.get_mut(&self.id)?;
        let previous = self
            .previous
            .take()
            .ok_or_else(|| OperationError::NotExecuted(format!("edit {}", self.id)))?;

        document.restore_content(previous.content, previous.modified_at);
        self.state = OperationState::Undone;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DeleteOperation {
    id: DocumentId,
    // Full snapshot of the removed document.
    removed: Option<Document>,
    state: OperationState,
}

impl DeleteOperation {
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn removed(&self) -> Option<&Document> {
        self.removed.as_ref()
    }

    fn execute(&mut self, documents: &mut DocumentStore) -> Result<(), OperationError> {
        let removed = documents.remove(&self.id)?;
        self.removed = Some(removed);
        self.state = OperationState::Executed;
        Ok(())
    }

    fn undo(&mut self, documents: &mut DocumentStore) -> Result<(), OperationError> {
        let snapshot = self
            .removed
            .as_ref()
            .ok_or_else(|| OperationError::NotExecuted(format!("delete {}", self.id)))?;

        // Keep the snapshot if reinsertion is refused.
        documents.insert(snapshot.clone())?;
        self.removed = None;
        self.state = OperationState::Undone;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MacroOperation {
    children: Vec<Operation>,
    state: OperationState,
}

impl MacroOperation {
    pub fn children(&self) -> &[Operation] {
        &self.children
    }

    fn execute(
        &mut self,
        documents: &mut DocumentStore,
        now: DateTime<Utc>,
    ) -> Result<(), OperationError> {
        for child in &mut self.children {
            // Applied by an earlier attempt that failed further along.
            if child.state() == OperationState::Executed {
                continue;
            }
            child.execute(documents, now)?;
        }
        self.state = OperationState::Executed;
        Ok(())
    }

    fn undo(&mut self, documents: &mut DocumentStore) -> Result<(), OperationError> {
        for child in self.children.iter_mut().rev() {
            if child.state() != OperationState::Executed {
                continue;
            }
            child.undo(documents)?;
        }
        self.state = OperationState::Undone;
        Ok(())
    }
}
