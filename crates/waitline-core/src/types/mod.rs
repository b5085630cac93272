//! Shared value types for queues, history and the ordered-set store.

pub mod history;
pub mod queue;
pub mod store;

pub use history::{HistoryAction, HistoryEntry};
pub use queue::{EntryStatus, NOT_WAITING, QueueStats};
pub use store::{KeyTtl, ScanPage, ScoredMember};
