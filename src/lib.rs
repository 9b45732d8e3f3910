//! In-memory undo/redo command history over a collection of documents.
//!
//! `doc-history` records reversible operations (create, edit, delete, and
//! macros grouping several of them) against a document collection owned by a
//! [`HistoryManager`](history::HistoryManager). Undo and redo walk a single
//! cursor over the recorded history; executing a new operation after an undo
//! discards the redo tail.
//!
//! Everything is single-actor and in-memory. Nothing is persisted.

pub mod document;
pub mod history;
pub mod types;
