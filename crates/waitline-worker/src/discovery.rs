//! Active queue discovery over wait-set keys.

use std::collections::HashSet;
use std::sync::Arc;

use waitline_core::result::AppResult;
use waitline_core::traits::store::QueueStore;
use waitline_store::keys;

/// One page of discovered queue names.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryPage {
    /// Cursor for the next page, `0` when the scan is complete.
    pub cursor: u64,
    /// Queue names found on this page.
    pub queues: Vec<String>,
}

/// Finds queues with a non-empty wait set by scanning keys page by page.
#[derive(Debug, Clone)]
pub struct QueueDiscovery {
    /// Store to scan.
    store: Arc<dyn QueueStore>,
    /// SCAN COUNT hint.
    batch_size: usize,
}

impl QueueDiscovery {
    /// Create a discovery over `store` using `batch_size` keys per page.
    pub fn new(store: Arc<dyn QueueStore>, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
        }
    }

    /// Fetch the page starting at `cursor` (`0` starts a new scan).
    pub async fn page(&self, cursor: u64) -> AppResult<DiscoveryPage> {
        let page = self
            .store
            .scan(cursor, &keys::wait_set_pattern(), self.batch_size)
            .await?;

        let queues = page
            .keys
            .iter()
            .filter_map(|key| keys::queue_from_wait_key(key))
            .map(str::to_string)
            .collect();

        Ok(DiscoveryPage {
            cursor: page.cursor,
            queues,
        })
    }

    /// Run a complete scan and return each active queue once.
    pub async fn active_queues(&self) -> AppResult<Vec<String>> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        let mut cursor = 0;

        loop {
            let page = self.page(cursor).await?;
            for queue in page.queues {
                if seen.insert(queue.clone()) {
                    found.push(queue);
                }
            }
            if page.cursor == 0 {
                break;
            }
            cursor = page.cursor;
        }

        Ok(found)
    }
}
