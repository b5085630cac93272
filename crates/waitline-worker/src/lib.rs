//! Background admission and runtime wiring for Waitline.
//!
//! This crate provides:
//! - A scheduler that periodically admits a fixed quota from every active queue
//! - Cursor-paginated discovery of active queues
//! - The runtime that assembles store, notifier, and services from configuration

pub mod discovery;
pub mod runtime;
pub mod scheduler;

pub use discovery::QueueDiscovery;
pub use runtime::WaitlineRuntime;
pub use scheduler::{AdmissionScheduler, TickReport};
