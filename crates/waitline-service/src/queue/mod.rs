//! Queue admission engine.

pub mod member;
pub mod score;
pub mod service;

pub use service::AdmissionService;
