//! JSON serialization for queue events.
//!
//! Events travel as `{"queue", "userId", "eventType", "data"}` objects.

use waitline_core::events::QueueEvent;
use waitline_core::result::AppResult;

/// Serialize an event for a pub/sub channel.
pub fn encode_event(event: &QueueEvent) -> AppResult<String> {
    Ok(serde_json::to_string(event)?)
}

/// Deserialize an event received from a pub/sub channel.
pub fn decode_event(payload: &str) -> AppResult<QueueEvent> {
    Ok(serde_json::from_str(payload)?)
}
