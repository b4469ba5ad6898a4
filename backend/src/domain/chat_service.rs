//! Chat thread service for guests and staff.
//!
//! Every call is gated by the chat access rule: staff may open any thread, a
//! guest only their own. Sender labels are resolved from Ticket Records, so
//! rendering needs the ticket store as well as the thread store.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use mockable::Clock;
use tracing::{debug, error, warn};

use crate::domain::ports::{
    ChatCommand, ChatQuery, ChatThreadFeed, ChatThreadRepository, ChatThreadRepositoryError,
    RenderedThreadStream, SendMessageRequest, SendOutcome, ThreadSubscription, TicketRepository,
};
use crate::domain::{
    ChatMessage, ChatThread, DisplayClock, EmailAddress, Error, GuestName, MessageText,
    MessageTextError, RenderedThread, SenderNames, StaffDirectory, UserId, Viewer,
};

const FORBIDDEN_THREAD: &str = "chat thread belongs to another guest";

fn map_thread_repository_error(error: ChatThreadRepositoryError) -> Error {
    match error {
        ChatThreadRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("chat store unavailable: {message}"))
        }
        ChatThreadRepositoryError::Query { message } => {
            Error::internal(format!("chat store error: {message}"))
        }
    }
}

/// Sender names resolved so far, plus the emails known to have none.
#[derive(Default)]
struct NameCache {
    names: SenderNames,
    checked: HashSet<EmailAddress>,
}

/// Service implementing [`ChatCommand`] and [`ChatQuery`].
pub struct ChatService<C: ?Sized, T: ?Sized, F: ?Sized> {
    threads: Arc<C>,
    tickets: Arc<T>,
    feed: Arc<F>,
    staff: Arc<StaffDirectory>,
    clock: Arc<dyn Clock>,
    display: DisplayClock,
}

impl<C: ?Sized, T: ?Sized, F: ?Sized> Clone for ChatService<C, T, F> {
    fn clone(&self) -> Self {
        Self {
            threads: Arc::clone(&self.threads),
            tickets: Arc::clone(&self.tickets),
            feed: Arc::clone(&self.feed),
            staff: Arc::clone(&self.staff),
            clock: Arc::clone(&self.clock),
            display: self.display,
        }
    }
}

impl<C: ?Sized, T: ?Sized, F: ?Sized> ChatService<C, T, F> {
    /// Create a chat service.
    pub fn new(
        threads: Arc<C>,
        tickets: Arc<T>,
        feed: Arc<F>,
        staff: Arc<StaffDirectory>,
        clock: Arc<dyn Clock>,
        display: DisplayClock,
    ) -> Self {
        Self {
            threads,
            tickets,
            feed,
            staff,
            clock,
            display,
        }
    }
}

impl<C: ?Sized, T: ?Sized, F: ?Sized> ChatService<C, T, F>
where
    C: ChatThreadRepository,
    T: TicketRepository,
    F: ChatThreadFeed,
{
    async fn guest_display_name(&self, guest_id: &UserId) -> Option<GuestName> {
        match self.tickets.find_by_id(guest_id).await {
            Ok(record) => record.map(|ticket| ticket.name().clone()),
            Err(err) => {
                warn!(%guest_id, error = %err, "guest name lookup failed");
                None
            }
        }
    }

    async fn resolve_names(&self, thread: Option<&ChatThread>, cache: &mut NameCache) {
        let Some(thread) = thread else { return };
        let pending: HashSet<EmailAddress> = thread
            .messages()
            .iter()
            .map(|message| message.sender_email().clone())
            .filter(|email| !cache.checked.contains(email))
            .collect();
        for email in pending {
            match self.tickets.find_by_email(&email).await {
                Ok(Some(record)) => {
                    cache.names.insert(email.clone(), record.name().as_str());
                    cache.checked.insert(email);
                }
                Ok(None) => {
                    cache.checked.insert(email);
                }
                Err(err) => warn!(%email, error = %err, "sender name lookup failed"),
            }
        }
    }

    async fn render(
        &self,
        viewer: &Viewer,
        guest_id: &UserId,
        thread: Option<&ChatThread>,
        cache: &mut NameCache,
    ) -> RenderedThread {
        self.resolve_names(thread, cache).await;
        RenderedThread::render(
            guest_id,
            thread,
            viewer.role,
            &self.staff,
            &cache.names,
            self.clock.utc(),
            self.display,
        )
    }
}

#[async_trait]
impl<C: ?Sized, T: ?Sized, F: ?Sized> ChatCommand for ChatService<C, T, F>
where
    C: ChatThreadRepository,
    T: TicketRepository,
    F: ChatThreadFeed,
{
    async fn send(&self, request: SendMessageRequest) -> Result<SendOutcome, Error> {
        let SendMessageRequest {
            viewer,
            guest_id,
            text,
        } = request;
        if !viewer.may_access_chat(guest_id.as_str()) {
            return Err(Error::forbidden(FORBIDDEN_THREAD));
        }
        let text = match MessageText::new(text) {
            Ok(text) => text,
            Err(MessageTextError::Blank) => return Ok(SendOutcome { sent: false }),
            Err(err @ MessageTextError::TooLong { .. }) => {
                return Err(Error::invalid_request(err.to_string()));
            }
        };

        let display_name = self.guest_display_name(&guest_id).await;
        let message = ChatMessage::new(viewer.identity.email().clone(), text, self.clock.utc());
        match self
            .threads
            .append_message(&guest_id, display_name, &message)
            .await
        {
            Ok(thread) => {
                debug!(%guest_id, messages = thread.messages().len(), "message appended");
                self.feed.publish(&thread);
                Ok(SendOutcome { sent: true })
            }
            Err(err) => {
                error!(%guest_id, error = %err, "message write failed");
                Ok(SendOutcome { sent: false })
            }
        }
    }
}

#[async_trait]
impl<C: ?Sized, T: ?Sized, F: ?Sized> ChatQuery for ChatService<C, T, F>
where
    C: ChatThreadRepository + 'static,
    T: TicketRepository + 'static,
    F: ChatThreadFeed + 'static,
{
    async fn view(&self, viewer: &Viewer, guest_id: &UserId) -> Result<RenderedThread, Error> {
        if !viewer.may_access_chat(guest_id.as_str()) {
            return Err(Error::forbidden(FORBIDDEN_THREAD));
        }
        let thread = self
            .threads
            .find(guest_id)
            .await
            .map_err(map_thread_repository_error)?;
        let mut cache = NameCache::default();
        Ok(self
            .render(viewer, guest_id, thread.as_ref(), &mut cache)
            .await)
    }

    async fn watch(
        &self,
        viewer: &Viewer,
        guest_id: &UserId,
    ) -> Result<RenderedThreadStream, Error> {
        if !viewer.may_access_chat(guest_id.as_str()) {
            return Err(Error::forbidden(FORBIDDEN_THREAD));
        }
        // Subscribe before the initial read so no write falls between them.
        let subscription = self.feed.subscribe(guest_id);
        let thread = self
            .threads
            .find(guest_id)
            .await
            .map_err(map_thread_repository_error)?;
        let mut cache = NameCache::default();
        let first = self
            .render(viewer, guest_id, thread.as_ref(), &mut cache)
            .await;

        let state = WatchState {
            service: self.clone(),
            subscription,
            cache,
            viewer: viewer.clone(),
            guest_id: guest_id.clone(),
            seen: thread.as_ref().map_or(0, |thread| thread.messages().len()),
        };
        let updates = stream::unfold(state, |mut state| async move {
            // Threads only grow; anything not longer than what was rendered is stale.
            let thread = loop {
                let thread = state.subscription.next().await?;
                if thread.messages().len() > state.seen {
                    break thread;
                }
            };
            state.seen = thread.messages().len();
            let rendered = state
                .service
                .render(
                    &state.viewer,
                    &state.guest_id,
                    Some(&thread),
                    &mut state.cache,
                )
                .await;
            Some((rendered, state))
        });
        Ok(RenderedThreadStream::new(
            stream::once(async move { first }).chain(updates),
        ))
    }
}

struct WatchState<C: ?Sized, T: ?Sized, F: ?Sized> {
    service: ChatService<C, T, F>,
    subscription: ThreadSubscription,
    cache: NameCache,
    viewer: Viewer,
    guest_id: UserId,
    /// Message count of the last snapshot rendered.
    seen: usize,
}

#[cfg(test)]
#[path = "chat_service_tests.rs"]
mod tests;
