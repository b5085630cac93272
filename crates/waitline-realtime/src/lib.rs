//! # waitline-realtime
//!
//! Fan-out of queue lifecycle events to subscribers. Events are published
//! per queue channel with at-most-once, best-effort delivery: late
//! subscribers miss earlier events and slow in-memory subscribers skip what
//! they lagged behind on.
//!
//! - **memory**: tokio broadcast channels for single-node deployments
//! - **redis**: Redis PUBLISH/SUBSCRIBE for multi-node deployments

pub mod bridge;
pub mod manager;
pub mod message;
pub mod stream;

pub use manager::NotifierManager;
pub use stream::for_user;
