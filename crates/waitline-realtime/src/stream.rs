//! Subscriber-side stream helpers.

use futures::{StreamExt, future};

use waitline_core::traits::notifier::QueueEventStream;

/// Narrow a queue's event stream to one user's events.
pub fn for_user(events: QueueEventStream, user_id: i64) -> QueueEventStream {
    events
        .filter(move |event| future::ready(event.user_id == user_id))
        .boxed()
}
