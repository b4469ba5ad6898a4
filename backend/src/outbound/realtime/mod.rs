//! Live Chat Thread feed over tokio broadcast channels.
//!
//! One channel per thread, created on first subscription. Every message is a
//! full snapshot, so a subscriber that lags behind simply skips to the newest
//! one. Threads only grow, so a snapshot holding no more messages than the
//! last one sent on its channel is stale and never forwarded. Channels whose
//! receivers are all gone are dropped on the next publish.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::stream;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::domain::ports::{ChatThreadFeed, ThreadSubscription};
use crate::domain::{ChatThread, UserId};

const DEFAULT_CAPACITY: usize = 16;

#[derive(Debug)]
struct Channel {
    sender: broadcast::Sender<ChatThread>,
    /// Message count of the newest snapshot sent on this channel.
    published: usize,
}

/// In-process [`ChatThreadFeed`] shared by every HTTP worker.
#[derive(Debug)]
pub struct BroadcastChatFeed {
    channels: Mutex<HashMap<UserId, Channel>>,
    capacity: usize,
}

impl Default for BroadcastChatFeed {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl BroadcastChatFeed {
    /// Create a feed with the default per-thread buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a feed buffering `capacity` snapshots per thread.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    fn channels(&self) -> MutexGuard<'_, HashMap<UserId, Channel>> {
        // The map holds no invariants a panicking holder could break.
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn channel_count(&self) -> usize {
        self.channels().len()
    }
}

impl ChatThreadFeed for BroadcastChatFeed {
    fn publish(&self, thread: &ChatThread) {
        let mut channels = self.channels();
        let Some(channel) = channels.get_mut(thread.guest_id()) else {
            return;
        };
        let count = thread.messages().len();
        if count <= channel.published {
            debug!(
                guest_id = thread.guest_id().as_str(),
                count,
                published = channel.published,
                "skipping stale chat snapshot"
            );
            return;
        }
        channel.published = count;
        if channel.sender.send(thread.clone()).is_err() {
            debug!(guest_id = thread.guest_id().as_str(), "dropping idle chat channel");
            channels.remove(thread.guest_id());
        }
    }

    fn subscribe(&self, guest_id: &UserId) -> ThreadSubscription {
        let receiver = self
            .channels()
            .entry(guest_id.clone())
            .or_insert_with(|| Channel {
                sender: broadcast::channel(self.capacity).0,
                published: 0,
            })
            .sender
            .subscribe();
        let guest = guest_id.clone();
        ThreadSubscription::new(stream::unfold(receiver, move |mut receiver| {
            let guest = guest.clone();
            async move {
                loop {
                    match receiver.recv().await {
                        Ok(thread) => return Some((thread, receiver)),
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(guest_id = guest.as_str(), skipped, "chat subscriber lagged");
                        }
                        Err(RecvError::Closed) => return None,
                    }
                }
            }
        }))
    }
}
