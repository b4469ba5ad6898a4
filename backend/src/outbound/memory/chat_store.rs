//! In-process `ChatThreadRepository`.
//!
//! Appends take the write lock for the whole read-modify-write, so concurrent
//! senders never lose each other's messages.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{ChatThreadRepository, ChatThreadRepositoryError};
use crate::domain::{ChatMessage, ChatThread, GuestName, UserId};

/// Chat Threads keyed by owning guest.
#[derive(Debug, Default)]
pub struct MemoryChatThreadRepository {
    threads: RwLock<HashMap<UserId, ChatThread>>,
}

impl MemoryChatThreadRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatThreadRepository for MemoryChatThreadRepository {
    async fn find(
        &self,
        guest_id: &UserId,
    ) -> Result<Option<ChatThread>, ChatThreadRepositoryError> {
        Ok(self.threads.read().await.get(guest_id).cloned())
    }

    async fn append_message(
        &self,
        guest_id: &UserId,
        display_name: Option<GuestName>,
        message: &ChatMessage,
    ) -> Result<ChatThread, ChatThreadRepositoryError> {
        let mut threads = self.threads.write().await;
        let thread = match threads.get_mut(guest_id) {
            Some(thread) => {
                thread.fill_display_name_if_absent(display_name);
                thread.append(message.clone());
                thread.clone()
            }
            None => {
                let thread = ChatThread::start(guest_id.clone(), display_name, message.clone());
                threads.insert(guest_id.clone(), thread.clone());
                thread
            }
        };
        Ok(thread)
    }
}
