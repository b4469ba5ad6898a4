//! Port for Chat Thread persistence.

use async_trait::async_trait;

use crate::domain::{ChatMessage, ChatThread, GuestName, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by chat thread repository adapters.
    pub enum ChatThreadRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "chat thread repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "chat thread repository query failed: {message}",
    }
}

/// Port for reading threads and appending messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatThreadRepository: Send + Sync {
    /// Load the thread owned by `guest_id`.
    async fn find(&self, guest_id: &UserId) -> Result<Option<ChatThread>, ChatThreadRepositoryError>;

    /// Append `message`, creating the thread when absent.
    ///
    /// `display_name` is recorded only when the thread has none yet.
    /// Concurrent appends must all survive. Returns the thread after the
    /// append.
    async fn append_message(
        &self,
        guest_id: &UserId,
        display_name: Option<GuestName>,
        message: &ChatMessage,
    ) -> Result<ChatThread, ChatThreadRepositoryError>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureChatThreadRepository;

#[async_trait]
impl ChatThreadRepository for FixtureChatThreadRepository {
    async fn find(
        &self,
        _guest_id: &UserId,
    ) -> Result<Option<ChatThread>, ChatThreadRepositoryError> {
        Ok(None)
    }

    async fn append_message(
        &self,
        guest_id: &UserId,
        display_name: Option<GuestName>,
        message: &ChatMessage,
    ) -> Result<ChatThread, ChatThreadRepositoryError> {
        Ok(ChatThread::start(
            guest_id.clone(),
            display_name,
            message.clone(),
        ))
    }
}
