//! Driving port for reading and watching chat threads.

use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures_util::stream::{BoxStream, Stream};

use crate::domain::{Error, RenderedThread, UserId, Viewer};

/// Rendered snapshots of one thread for one viewer.
///
/// Holds exactly one feed subscription; dropping it unsubscribes.
pub struct RenderedThreadStream {
    inner: BoxStream<'static, RenderedThread>,
}

impl RenderedThreadStream {
    /// Wrap any rendered snapshot stream.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = RenderedThread> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }
}

impl std::fmt::Debug for RenderedThreadStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedThreadStream").finish_non_exhaustive()
    }
}

impl Stream for RenderedThreadStream {
    type Item = RenderedThread;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Domain use-case port for chat reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatQuery: Send + Sync {
    /// Current thread rendered for `viewer`.
    ///
    /// Returns `forbidden` when the viewer may not open the thread.
    async fn view(&self, viewer: &Viewer, guest_id: &UserId) -> Result<RenderedThread, Error>;

    /// Rendered snapshot after every change to the thread.
    async fn watch(&self, viewer: &Viewer, guest_id: &UserId)
        -> Result<RenderedThreadStream, Error>;
}

/// Query port over an empty store.
#[derive(Debug, Default, Clone)]
pub struct FixtureChatQuery;

#[async_trait]
impl ChatQuery for FixtureChatQuery {
    async fn view(&self, viewer: &Viewer, guest_id: &UserId) -> Result<RenderedThread, Error> {
        if !viewer.may_access_chat(guest_id.as_str()) {
            return Err(Error::forbidden("chat thread belongs to another guest"));
        }
        Ok(RenderedThread::render(
            guest_id,
            None,
            viewer.role,
            &crate::domain::StaffDirectory::default(),
            &crate::domain::SenderNames::default(),
            chrono::Utc::now(),
            crate::domain::DisplayClock::utc(),
        ))
    }

    async fn watch(
        &self,
        viewer: &Viewer,
        guest_id: &UserId,
    ) -> Result<RenderedThreadStream, Error> {
        let first = self.view(viewer, guest_id).await?;
        Ok(RenderedThreadStream::new(futures_util::stream::iter([first])))
    }
}
