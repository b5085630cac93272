//! # waitline-core
//!
//! Core crate for Waitline. Contains configuration schemas, the ordered-set
//! store and notifier capability traits, queue domain types and events,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other Waitline crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
