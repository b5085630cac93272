//! # waitline-service
//!
//! Business logic for Waitline. The admission engine orchestrates the
//! ordered-set store, the history log, and the notifier to implement queue
//! registration, batch admission, and rank queries. The token service
//! derives bypass credentials.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references.

pub mod error;
pub mod history;
pub mod queue;
pub mod token;

pub use error::QueueError;
pub use history::HistoryService;
pub use queue::AdmissionService;
pub use token::TokenService;
