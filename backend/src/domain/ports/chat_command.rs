//! Driving port for sending chat messages.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Error, UserId, Viewer};

/// Send one message to a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageRequest {
    pub viewer: Viewer,
    pub guest_id: UserId,
    pub text: String,
}

/// Result of a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SendOutcome {
    /// `false` for blank input or a failed store write.
    pub sent: bool,
}

/// Domain use-case port for appending messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCommand: Send + Sync {
    /// Append a message, creating the thread when absent.
    ///
    /// Returns `forbidden` when the viewer may not open the thread.
    async fn send(&self, request: SendMessageRequest) -> Result<SendOutcome, Error>;
}

/// Command port that accepts non-blank messages without storing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureChatCommand;

#[async_trait]
impl ChatCommand for FixtureChatCommand {
    async fn send(&self, request: SendMessageRequest) -> Result<SendOutcome, Error> {
        if !request.viewer.may_access_chat(request.guest_id.as_str()) {
            return Err(Error::forbidden("chat thread belongs to another guest"));
        }
        Ok(SendOutcome {
            sent: !request.text.trim().is_empty(),
        })
    }
}
