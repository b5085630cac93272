//! Bypass token configuration.

use serde::{Deserialize, Serialize};

/// Bypass token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Fixed prefix of the digested input string.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Optional server-side secret. When set, tokens are HMAC-SHA256 tags
    /// instead of plain SHA-256 digests.
    #[serde(default)]
    pub secret: Option<String>,
    /// Max-age of the token cookie handed out by the transport layer.
    #[serde(default = "default_cookie_max_age")]
    pub cookie_max_age_seconds: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            secret: None,
            cookie_max_age_seconds: default_cookie_max_age(),
        }
    }
}

fn default_prefix() -> String {
    "user-queue".to_string()
}

fn default_cookie_max_age() -> u64 {
    300
}
