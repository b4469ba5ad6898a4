//! Chat Thread entity.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{EmailAddress, GuestName, UserId};

/// Maximum message length in characters.
pub const MESSAGE_MAX: usize = 4000;

/// Rejections for outgoing message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MessageTextError {
    /// Only whitespace was supplied.
    #[error("message must not be blank")]
    Blank,
    /// The message exceeded [`MESSAGE_MAX`] characters.
    #[error("message must be at most {max} characters")]
    TooLong { max: usize },
}

/// Non-blank message body, stored as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageText(String);

impl MessageText {
    /// Validate a message body.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::{MessageText, MessageTextError};
    ///
    /// assert!(MessageText::new("hello").is_ok());
    /// assert_eq!(MessageText::new(" \u{3000}"), Err(MessageTextError::Blank));
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, MessageTextError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(MessageTextError::Blank);
        }
        if raw.chars().count() > MESSAGE_MAX {
            return Err(MessageTextError::TooLong { max: MESSAGE_MAX });
        }
        Ok(Self(raw))
    }

    /// Borrow the body.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// One message in a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    sender_email: EmailAddress,
    text: MessageText,
    created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Assemble a message.
    pub fn new(sender_email: EmailAddress, text: MessageText, created_at: DateTime<Utc>) -> Self {
        Self {
            sender_email,
            text,
            created_at,
        }
    }

    /// Email of the sending identity.
    pub fn sender_email(&self) -> &EmailAddress {
        &self.sender_email
    }

    /// Body.
    pub fn text(&self) -> &MessageText {
        &self.text
    }

    /// Send time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Append-only message log of one guest.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use helpdesk::domain::*;
///
/// let guest = UserId::new("taro").unwrap();
/// let first = ChatMessage::new(
///     EmailAddress::new("taro@example.com").unwrap(),
///     MessageText::new("hello").unwrap(),
///     Utc::now(),
/// );
/// let mut thread = ChatThread::start(guest, None, first);
/// assert_eq!(thread.messages().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatThread {
    guest_id: UserId,
    guest_display_name: Option<GuestName>,
    messages: Vec<ChatMessage>,
}

impl ChatThread {
    /// Create a thread holding exactly one message.
    pub fn start(
        guest_id: UserId,
        guest_display_name: Option<GuestName>,
        first: ChatMessage,
    ) -> Self {
        Self {
            guest_id,
            guest_display_name,
            messages: vec![first],
        }
    }

    /// Rehydrate a stored thread. Messages must already be in append order.
    pub fn from_parts(
        guest_id: UserId,
        guest_display_name: Option<GuestName>,
        messages: Vec<ChatMessage>,
    ) -> Self {
        Self {
            guest_id,
            guest_display_name,
            messages,
        }
    }

    /// Append one message, preserving every prior entry.
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Set the display name only when none is recorded.
    pub fn fill_display_name_if_absent(&mut self, name: Option<GuestName>) {
        if self.guest_display_name.is_none() {
            self.guest_display_name = name;
        }
    }

    /// Owning guest.
    pub fn guest_id(&self) -> &UserId {
        &self.guest_id
    }

    /// Denormalised guest name.
    pub fn guest_display_name(&self) -> Option<&GuestName> {
        self.guest_display_name.as_ref()
    }

    /// Messages in append order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn message(sender: &str, text: &str, second: u32) -> ChatMessage {
        ChatMessage::new(
            EmailAddress::new(sender).expect("email"),
            MessageText::new(text).expect("text"),
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, second)
                .single()
                .expect("timestamp"),
        )
    }

    #[fixture]
    fn thread() -> ChatThread {
        ChatThread::start(
            UserId::new("taro").expect("id"),
            None,
            message("taro@example.com", "hello", 0),
        )
    }

    #[rstest]
    fn start_creates_exactly_one_message(thread: ChatThread) {
        assert_eq!(thread.messages().len(), 1);
    }

    #[rstest]
    fn append_preserves_prior_entries(mut thread: ChatThread) {
        let before = thread.messages().to_vec();
        thread.append(message("staff1@example.com", "hi there", 1));
        thread.append(message("taro@example.com", "thanks", 1));

        assert_eq!(thread.messages().len(), before.len() + 2);
        assert_eq!(&thread.messages()[..1], before.as_slice());
        let texts: Vec<&str> = thread.messages().iter().map(|m| m.text().as_str()).collect();
        assert_eq!(texts, ["hello", "hi there", "thanks"]);
    }

    #[rstest]
    fn display_name_is_only_filled_when_absent(mut thread: ChatThread) {
        let taro = GuestName::new("Taro").expect("name");
        thread.fill_display_name_if_absent(Some(taro.clone()));
        thread.fill_display_name_if_absent(Some(GuestName::new("Other").expect("name")));
        assert_eq!(thread.guest_display_name(), Some(&taro));
    }

    #[rstest]
    #[case("")]
    #[case("  \n")]
    #[case("\u{3000}")]
    fn blank_text_is_rejected(#[case] raw: &str) {
        assert_eq!(MessageText::new(raw), Err(MessageTextError::Blank));
    }

    #[rstest]
    fn text_keeps_surrounding_whitespace() {
        assert_eq!(MessageText::new(" hi ").expect("text").as_str(), " hi ");
    }

    #[rstest]
    fn oversize_text_is_rejected() {
        assert_eq!(
            MessageText::new("a".repeat(MESSAGE_MAX + 1)),
            Err(MessageTextError::TooLong { max: MESSAGE_MAX })
        );
    }
}
