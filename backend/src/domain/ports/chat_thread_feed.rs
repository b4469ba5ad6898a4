//! Port for live Chat Thread change notification.
//!
//! A subscription is a stream of full-thread snapshots. Dropping the
//! [`ThreadSubscription`] unsubscribes; there is no separate teardown call.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::stream::{BoxStream, Stream};

use crate::domain::{ChatThread, UserId};

/// Stream of snapshots for one thread.
pub struct ThreadSubscription {
    inner: BoxStream<'static, ChatThread>,
}

impl ThreadSubscription {
    /// Wrap any snapshot stream.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = ChatThread> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }

    /// A subscription that never yields.
    pub fn empty() -> Self {
        Self::new(futures_util::stream::empty())
    }
}

impl std::fmt::Debug for ThreadSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadSubscription").finish_non_exhaustive()
    }
}

impl Stream for ThreadSubscription {
    type Item = ChatThread;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Port for publishing thread changes and subscribing to them.
#[cfg_attr(test, mockall::automock)]
pub trait ChatThreadFeed: Send + Sync {
    /// Notify subscribers of `thread` after a successful write.
    fn publish(&self, thread: &ChatThread);

    /// Subscribe to changes of the thread owned by `guest_id`.
    fn subscribe(&self, guest_id: &UserId) -> ThreadSubscription;
}

/// Feed that drops every publication.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureChatThreadFeed;

impl ChatThreadFeed for FixtureChatThreadFeed {
    fn publish(&self, _thread: &ChatThread) {}

    fn subscribe(&self, _guest_id: &UserId) -> ThreadSubscription {
        ThreadSubscription::empty()
    }
}
