//! Bypass token derivation and verification.

pub mod service;

pub use service::TokenService;
