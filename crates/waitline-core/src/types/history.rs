//! Admission lifecycle history records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle action recorded in the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryAction {
    /// The user entered a wait set.
    Register,
    /// The user was moved to the proceed set.
    Allow,
    /// The user's wait-set entry expired.
    Expire,
}

impl HistoryAction {
    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Register => "REGISTER",
            Self::Allow => "ALLOW",
            Self::Expire => "EXPIRE",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGISTER" => Ok(Self::Register),
            "ALLOW" => Ok(Self::Allow),
            "EXPIRE" => Ok(Self::Expire),
            other => Err(format!("unknown history action '{other}'")),
        }
    }
}

/// One entry of a per-user or per-queue history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Queue the action happened on.
    pub queue: String,
    /// User the action applies to.
    pub user_id: i64,
    /// What happened.
    pub action: HistoryAction,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// RFC 3339 rendering of `timestamp`.
    pub formatted_time: String,
}

impl HistoryEntry {
    /// Build an entry, deriving `formatted_time` from `timestamp`.
    pub fn new(queue: impl Into<String>, user_id: i64, action: HistoryAction, timestamp: i64) -> Self {
        let formatted_time = DateTime::<Utc>::from_timestamp(timestamp, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        Self {
            queue: queue.into(),
            user_id,
            action,
            timestamp,
            formatted_time,
        }
    }
}
