//! # waitline-store
//!
//! Ordered-set store implementations for Waitline. Supports two modes:
//!
//! - **memory**: In-process sorted sets and lists for single-node use and tests
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::StoreManager;
