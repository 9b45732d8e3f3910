use std::collections::BTreeMap;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::trace;

use super::document::Document;
use crate::types::identifiers::DocumentId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),
    #[error("Duplicate document ID: {0}")]
    DuplicateId(DocumentId),
}

/// Live documents keyed by id.
///
/// Two documents with the same id never coexist; iteration is in id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentStore {
    documents: BTreeMap<DocumentId, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, document: Document) -> Result<(), DocumentError> {
        if self.documents.contains_key(&document.id) {
            return Err(DocumentError::DuplicateId(document.id));
        }
        trace!(id = %document.id, "Inserting document");
        self.documents.insert(document.id.clone(), document);
        Ok(())
    }

    pub fn remove(&mut self, id: &DocumentId) -> Result<Document, DocumentError> {
        let removed = self
            .documents
            .remove(id)
            .ok_or_else(|| DocumentError::NotFound(id.clone()))?;
        trace!(id = %id, "Removed document");
        Ok(removed)
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn get_mut(&mut self, id: &DocumentId) -> Result<&mut Document, DocumentError> {
        self.documents
            .get_mut(id)
            .ok_or_else(|| DocumentError::NotFound(id.clone()))
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.documents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Hash of every document, in id order.
    ///
    /// Content enters through `version`, its sha256; every other field is
    /// hashed directly.
    ///
    /// Two stores with the same fingerprint hold identical documents.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for doc in self.documents.values() {
            // Length-prefix the free-form fields so boundaries cannot shift.
            let line = format!(
                "{}:{}:{}:{}:{}:{}:{}\n",
                doc.id.as_str().len(),
                doc.id.as_str(),
                doc.version.as_str(),
                doc.title.len(),
                doc.title,
                doc.created_at.to_rfc3339(),
                doc.modified_at.to_rfc3339(),
            );
            hasher.update(line.as_bytes());
        }
        format!("sha256:{}", hex::encode(hasher.finalize()))
    }
}
