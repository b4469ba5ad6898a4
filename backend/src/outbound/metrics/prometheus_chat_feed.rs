//! Prometheus decorator for the live chat feed.
//!
//! # Metric Specification
//!
//! - `helpdesk_chat_snapshots_published_total` (counter): thread snapshots
//!   handed to the feed after a successful append.
//! - `helpdesk_chat_subscriptions_active` (gauge): open chat sockets.

use std::sync::Arc;

use futures_util::StreamExt;
use prometheus::{IntCounter, IntGauge, Registry};

use crate::domain::ports::{ChatThreadFeed, ThreadSubscription};
use crate::domain::{ChatThread, UserId};

/// Wraps a [`ChatThreadFeed`] and records publications and open subscriptions.
pub struct PrometheusChatFeed {
    inner: Arc<dyn ChatThreadFeed>,
    published: IntCounter,
    active: IntGauge,
}

impl PrometheusChatFeed {
    /// Register the feed metrics with `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric with the same name is already registered.
    pub fn new(inner: Arc<dyn ChatThreadFeed>, registry: &Registry) -> Result<Self, prometheus::Error> {
        let published = IntCounter::new(
            "helpdesk_chat_snapshots_published_total",
            "Chat thread snapshots published to subscribers",
        )?;
        let active = IntGauge::new(
            "helpdesk_chat_subscriptions_active",
            "Open chat thread subscriptions",
        )?;
        registry.register(Box::new(published.clone()))?;
        registry.register(Box::new(active.clone()))?;
        Ok(Self {
            inner,
            published,
            active,
        })
    }
}

struct ActiveSubscription(IntGauge);

impl Drop for ActiveSubscription {
    fn drop(&mut self) {
        self.0.dec();
    }
}

impl ChatThreadFeed for PrometheusChatFeed {
    fn publish(&self, thread: &ChatThread) {
        self.published.inc();
        self.inner.publish(thread);
    }

    fn subscribe(&self, guest_id: &UserId) -> ThreadSubscription {
        self.active.inc();
        let guard = ActiveSubscription(self.active.clone());
        let snapshots = self.inner.subscribe(guest_id);
        // The guard lives as long as the stream does.
        ThreadSubscription::new(snapshots.map(move |thread| {
            let _held = &guard;
            thread
        }))
    }
}
