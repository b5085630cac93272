//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from an
//! optional TOML file overlaid with `WAITLINE_`-prefixed environment
//! variables. Each sub-module represents a logical configuration section and
//! every field has a default, so an empty file is a valid configuration.

pub mod history;
pub mod logging;
pub mod notification;
pub mod queue;
pub mod scheduler;
pub mod store;
pub mod token;

use serde::{Deserialize, Serialize};

pub use self::history::HistoryConfig;
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::notification::NotificationConfig;
pub use self::queue::QueueConfig;
pub use self::scheduler::SchedulerConfig;
pub use self::store::{RedisStoreConfig, StoreConfig};
pub use self::token::TokenConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Wait-set capacity and TTL settings.
    #[serde(default)]
    pub queue: QueueConfig,
    /// Periodic admission scheduler settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Ordered-set store backend settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Queue event fan-out settings.
    #[serde(default)]
    pub notification: NotificationConfig,
    /// Admission history retention settings.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Bypass token settings.
    #[serde(default)]
    pub token: TokenConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional. Environment variables prefixed with `WAITLINE`
    /// and separated by `__` override file values, e.g.
    /// `WAITLINE_QUEUE__MAX_CAPACITY=500`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        tracing::debug!(path, "Loading configuration");
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("WAITLINE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
