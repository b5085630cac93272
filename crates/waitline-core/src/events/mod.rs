//! Events emitted by admission lifecycle transitions.
//!
//! Events are fanned out per queue through the notification bus and
//! consumed by the streaming transport layer.

pub mod queue;

pub use queue::{QueueEvent, QueueEventType};
