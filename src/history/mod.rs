pub mod clock;
pub mod config;
pub mod manager;
pub mod operation;

pub use clock::{Clock, SystemClock};
pub use config::HistoryConfig;
pub use manager::HistoryManager;
pub use operation::{
    CreateOperation, DeleteOperation, EditOperation, MacroOperation, Operation, OperationError,
    OperationState,
};
