use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::identifiers::{DocumentId, DocumentVersion};

/// The unit of content mutated by operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub version: DocumentVersion,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        id: DocumentId,
        title: impl Into<String>,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let content = content.into();
        let version = DocumentVersion::from_content(content.as_bytes());

        Document {
            id,
            version,
            title: title.into(),
            content,
            created_at: now,
            modified_at: now,
        }
    }

    /// Replace the content and return what was there before.
    ///
    /// The returned value reflects the document at the moment of the call,
    /// which is what an edit must capture to be reversible.
    pub fn update_content(&mut self, content: impl Into<String>, now: DateTime<Utc>) -> String {
        let previous = std::mem::replace(&mut self.content, content.into());
        self.version = DocumentVersion::from_content(self.content.as_bytes());
        self.modified_at = now;
        previous
    }

    /// Put back content captured by an earlier [`update_content`](Self::update_content).
    pub fn restore_content(&mut self, content: String, modified_at: DateTime<Utc>) {
        self.version = DocumentVersion::from_content(content.as_bytes());
        self.content = content;
        self.modified_at = modified_at;
    }
}
