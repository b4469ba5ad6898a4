//! Rendered chat thread: bubble sides, sender labels and titles.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{EmailAddress, Role, StaffDirectory, UserId};

use super::{format_message_time, ChatThread, DisplayClock};

/// Title shown to staff viewers.
pub const STAFF_VIEWER_TITLE: &str = "Staff chat";
/// Title shown to guest viewers.
pub const GUEST_VIEWER_TITLE: &str = "Customer support";
/// Label for a staff sender whose name is unknown.
pub const STAFF_FALLBACK_LABEL: &str = "Support";
/// Guest name used when the thread carries none.
pub const GUEST_FALLBACK_NAME: &str = "Guest";

/// Which side of the conversation a bubble sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BubbleSide {
    /// Same role as the viewer.
    Own,
    /// The other party.
    Other,
}

impl BubbleSide {
    /// A bubble is on the viewer's side iff the roles match.
    pub fn for_roles(viewer: Role, sender: Role) -> Self {
        if viewer == sender {
            Self::Own
        } else {
            Self::Other
        }
    }
}

/// Names resolved from Ticket Records, keyed by sender email.
///
/// Built once per render so each distinct sender is looked up at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderNames(HashMap<EmailAddress, String>);

impl SenderNames {
    /// Record a resolved name.
    pub fn insert(&mut self, email: EmailAddress, name: impl Into<String>) {
        self.0.insert(email, name.into());
    }

    /// Resolved name for `email`, if any.
    pub fn get(&self, email: &EmailAddress) -> Option<&str> {
        self.0.get(email).map(String::as_str)
    }

    /// Whether `email` has already been resolved.
    pub fn contains(&self, email: &EmailAddress) -> bool {
        self.0.contains_key(email)
    }
}

/// Display label for a message sender.
///
/// # Examples
/// ```
/// use helpdesk::domain::{sender_label, Role};
///
/// assert_eq!(sender_label(Role::Staff, Some("Sato"), "Taro"), "Sato (support)");
/// assert_eq!(sender_label(Role::Staff, None, "Taro"), "Support");
/// assert_eq!(sender_label(Role::Guest, None, "Taro"), "Taro");
/// ```
pub fn sender_label(sender_role: Role, resolved_name: Option<&str>, guest_name: &str) -> String {
    match (sender_role, resolved_name) {
        (Role::Staff, Some(name)) => format!("{name} (support)"),
        (Role::Staff, None) => STAFF_FALLBACK_LABEL.to_owned(),
        (Role::Guest, Some(name)) => name.to_owned(),
        (Role::Guest, None) => guest_name.to_owned(),
    }
}

/// Page title for a viewer.
pub fn chat_title(viewer: Role) -> &'static str {
    match viewer {
        Role::Staff => STAFF_VIEWER_TITLE,
        Role::Guest => GUEST_VIEWER_TITLE,
    }
}

/// One bubble ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMessage {
    pub sender_label: String,
    pub side: BubbleSide,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub display_time: String,
}

/// A whole thread rendered for one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedThread {
    pub guest_id: UserId,
    pub title: String,
    pub guest_name: String,
    pub messages: Vec<RenderedMessage>,
}

impl RenderedThread {
    /// Render `thread` (or an empty thread when none exists yet).
    pub fn render(
        guest_id: &UserId,
        thread: Option<&ChatThread>,
        viewer: Role,
        staff: &StaffDirectory,
        names: &SenderNames,
        now: DateTime<Utc>,
        clock: DisplayClock,
    ) -> Self {
        let guest_name = thread
            .and_then(ChatThread::guest_display_name)
            .map_or_else(|| GUEST_FALLBACK_NAME.to_owned(), ToString::to_string);
        let messages = thread
            .map(ChatThread::messages)
            .unwrap_or_default()
            .iter()
            .map(|message| {
                let sender_role = staff.role_of(message.sender_email());
                RenderedMessage {
                    sender_label: sender_label(
                        sender_role,
                        names.get(message.sender_email()),
                        &guest_name,
                    ),
                    side: BubbleSide::for_roles(viewer, sender_role),
                    text: message.text().as_str().to_owned(),
                    created_at: message.created_at(),
                    display_time: format_message_time(message.created_at(), now, clock),
                }
            })
            .collect();
        Self {
            guest_id: guest_id.clone(),
            title: chat_title(viewer).to_owned(),
            guest_name,
            messages,
        }
    }
}
