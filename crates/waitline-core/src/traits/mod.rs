//! Capability traits defined in `waitline-core` and implemented by other crates.

pub mod notifier;
pub mod store;

pub use notifier::{QueueEventStream, QueueNotifier};
pub use store::QueueStore;
