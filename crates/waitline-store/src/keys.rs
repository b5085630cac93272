//! Store key and channel builders for all Waitline state.
//!
//! Every key embeds the queue name so a pattern scan over wait-set keys
//! enumerates the active queues.

/// Prefix applied to all per-queue keys.
const PREFIX: &str = "users:queue";

/// Prefix applied to all notification channels.
const CHANNEL_PREFIX: &str = "queue:notification";

/// Sorted set of waiting users, scored by priority.
pub fn wait_set(queue: &str) -> String {
    format!("{PREFIX}:{queue}:wait")
}

/// Sorted set of admitted users, scored by admission time.
pub fn proceed_set(queue: &str) -> String {
    format!("{PREFIX}:{queue}:proceed")
}

/// History list of one user within a queue.
pub fn user_history(queue: &str, user_id: i64) -> String {
    format!("{PREFIX}:{queue}:history:{user_id}")
}

/// Aggregate history list of a queue.
pub fn queue_history(queue: &str) -> String {
    format!("{PREFIX}:{queue}:all_history")
}

/// Scan pattern matching every wait-set key.
pub fn wait_set_pattern() -> String {
    format!("{PREFIX}:*:wait")
}

/// Extract the queue name from a wait-set key.
pub fn queue_from_wait_key(key: &str) -> Option<&str> {
    key.strip_prefix(PREFIX)
        .and_then(|rest| rest.strip_prefix(':'))
        .and_then(|rest| rest.strip_suffix(":wait"))
        .filter(|queue| !queue.is_empty())
}

/// Pub/sub channel carrying a queue's lifecycle events.
pub fn notification_channel(queue: &str) -> String {
    format!("{CHANNEL_PREFIX}:{queue}")
}
