//! Bypass tokens bound to a (queue, user) pair.
//!
//! Without a secret the token is `hex(SHA-256("{prefix}-{queue}-{user}"))`,
//! a public function of its inputs. With `token.secret` configured the same
//! input is signed with HMAC-SHA256 instead.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use waitline_core::config::TokenConfig;
use waitline_core::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Derives and verifies bypass tokens.
#[derive(Clone)]
pub struct TokenService {
    /// Token input prefix.
    prefix: String,
    /// Keyed MAC, when a secret is configured.
    keyed: Option<HmacSha256>,
    /// Cookie lifetime handed to transport adapters.
    cookie_max_age_seconds: u64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("prefix", &self.prefix)
            .field("keyed", &self.keyed.is_some())
            .field("cookie_max_age_seconds", &self.cookie_max_age_seconds)
            .finish()
    }
}

impl TokenService {
    /// Creates a token service from configuration.
    pub fn new(config: &TokenConfig) -> Result<Self, AppError> {
        let keyed = match config.secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => Some(HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| {
                AppError::configuration(format!("Invalid token secret: {e}"))
            })?),
            None => None,
        };

        Ok(Self {
            prefix: config.prefix.clone(),
            keyed,
            cookie_max_age_seconds: config.cookie_max_age_seconds,
        })
    }

    /// Derives the lowercase hex token for a user in a queue.
    pub fn derive(&self, queue: &str, user_id: i64) -> String {
        let input = format!("{}-{queue}-{user_id}", self.prefix);
        match &self.keyed {
            Some(mac) => {
                let mut mac = mac.clone();
                mac.update(input.as_bytes());
                hex::encode(mac.finalize().into_bytes())
            }
            None => hex::encode(Sha256::digest(input.as_bytes())),
        }
    }

    /// Checks a candidate token, ignoring ASCII case. Comparison is
    /// constant-time over the token bytes.
    pub fn verify(&self, queue: &str, user_id: i64, candidate: &str) -> bool {
        let expected = self.derive(queue, user_id);
        let candidate = candidate.to_ascii_lowercase();
        expected.as_bytes().ct_eq(candidate.as_bytes()).into()
    }

    /// Cookie name carrying the token for a queue.
    pub fn cookie_name(&self, queue: &str) -> String {
        format!("{}-{queue}-token", self.prefix)
    }

    /// Cookie max-age in seconds.
    pub fn cookie_max_age_seconds(&self) -> u64 {
        self.cookie_max_age_seconds
    }
}
