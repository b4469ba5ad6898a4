//! Chat Thread domain types and rendering policy.
//!
//! A thread is an append-only message log keyed by the owning guest's id.
//! Rendering decides bubble side and sender labels from roles alone, so every
//! staff member reads as one "support" voice to the guest and every guest
//! message reads as the customer to staff.

mod thread;
mod timestamp;
mod view;

pub use thread::{ChatMessage, ChatThread, MessageText, MessageTextError};
pub use timestamp::{format_detail_time, format_message_time, DisplayClock};
pub use view::{
    chat_title, sender_label, BubbleSide, RenderedMessage, RenderedThread, SenderNames,
    GUEST_FALLBACK_NAME, GUEST_VIEWER_TITLE, STAFF_FALLBACK_LABEL, STAFF_VIEWER_TITLE,
};
