//! Admission history log.

pub mod service;

pub use service::HistoryService;
