pub mod document;
pub mod store;

pub use crate::types::identifiers::{DocumentId, DocumentVersion};
pub use document::Document;
pub use store::{DocumentError, DocumentStore};
