pub mod history_info;
pub mod identifiers;

pub use history_info::HistoryInfo;
pub use identifiers::{DocumentId, DocumentVersion};
