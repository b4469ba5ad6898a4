//! Wire-level message definitions for the chat socket.
//!
//! Every frame is a JSON object tagged by `type`. The server pushes the whole
//! rendered thread on each change rather than deltas, so a client that missed
//! frames only has to wait for the next one.

use serde::{Deserialize, Serialize};

use crate::domain::{Error, RenderedThread};

/// Frames a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Post a message to the thread the socket is watching.
    Send {
        /// Message body; whitespace-only text is dropped.
        text: String,
    },
}

/// Frames the server pushes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full rendered thread after subscribe and after every change.
    Snapshot(RenderedThread),
    /// Outcome of a client `send`.
    Sent {
        /// `false` for blank input or a failed store write.
        sent: bool,
    },
    /// A `send` was rejected, for example oversize text.
    Error(Error),
}
