//! Broadcast bus for "new post created" notifications.
//!
//! When a compose action completes, only the new post's id is known; feeds
//! subscribe here and re-fetch the full post to splice it in. Delivery is
//! at-least-once to currently live subscribers, with no replay: a
//! subscriber that joins after a broadcast never sees it, and a lagging
//! subscriber may drop old ids.

use tokio::sync::broadcast;

/// Capacity of the broadcast channel. Post creation is a human-paced
/// event; lag only occurs if a subscriber stalls for a long time.
const CHANNEL_CAPACITY: usize = 64;

/// Pub/sub handle for new-post notifications.
#[derive(Debug, Clone)]
pub struct PostEvents {
    tx: broadcast::Sender<i64>,
}

impl PostEvents {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to post ids broadcast from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<i64> {
        self.tx.subscribe()
    }

    /// Announce a newly created post. Having no subscribers is fine.
    pub fn post_created(&self, post_id: i64) {
        if self.tx.send(post_id).is_err() {
            tracing::debug!("new post {} broadcast with no subscribers", post_id);
        }
    }
}

impl Default for PostEvents {
    fn default() -> Self {
        Self::new()
    }
}
