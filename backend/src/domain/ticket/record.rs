//! The Ticket Record entity and its mutations.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{EmailAddress, UserId};

use super::{
    Assignee, CommentText, GuestName, InquiryText, PhoneNumber, ProductCode, StaffName,
    TicketStatus,
};

/// Input payload for [`Ticket::new`].
#[derive(Debug, Clone)]
pub struct TicketDraft {
    pub owner_id: UserId,
    pub name: GuestName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub product: ProductCode,
    pub message: InquiryText,
}

/// One staff comment on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    author_name: StaffName,
    text: CommentText,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Assemble a comment.
    pub fn new(author_name: StaffName, text: CommentText, created_at: DateTime<Utc>) -> Self {
        Self {
            author_name,
            text,
            created_at,
        }
    }

    /// Staff member who wrote the comment.
    pub fn author_name(&self) -> &StaffName {
        &self.author_name
    }

    /// Comment body.
    pub fn text(&self) -> &CommentText {
        &self.text
    }

    /// When the comment was appended.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Result of [`Ticket::add_comment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentOutcome {
    /// The comment was appended to the log.
    Appended(Comment),
    /// Blank input; nothing changed.
    Ignored,
}

/// Persisted support request owned by one guest identity.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use helpdesk::domain::*;
///
/// let draft = TicketDraft {
///     owner_id: UserId::new("taro").unwrap(),
///     name: GuestName::new("Taro").unwrap(),
///     email: EmailAddress::new("taro@example.com").unwrap(),
///     phone: PhoneNumber::new("0312345678").unwrap(),
///     product: ProductCode::new("KM-001").unwrap(),
///     message: InquiryText::new("The keyboard stopped working").unwrap(),
/// };
/// let mut ticket = Ticket::new(draft, Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
/// assert_eq!(ticket.status(), TicketStatus::Unhandled);
///
/// ticket.set_status(TicketStatus::InProgress, &StaffName::new("Sato").unwrap());
/// assert_eq!(ticket.assignee().label(), "Sato");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    id: UserId,
    name: GuestName,
    email: EmailAddress,
    phone: PhoneNumber,
    #[serde(rename = "productType")]
    product: ProductCode,
    message: InquiryText,
    status: TicketStatus,
    assignee: Assignee,
    created_at: DateTime<Utc>,
    comments: Vec<Comment>,
}

impl Ticket {
    /// Create a fresh record: `unhandled`, `unassigned`, no comments.
    pub fn new(draft: TicketDraft, created_at: DateTime<Utc>) -> Self {
        let TicketDraft {
            owner_id,
            name,
            email,
            phone,
            product,
            message,
        } = draft;
        Self {
            id: owner_id,
            name,
            email,
            phone,
            product,
            message,
            status: TicketStatus::Unhandled,
            assignee: Assignee::Unassigned,
            created_at,
            comments: Vec::new(),
        }
    }

    /// Rehydrate a stored record.
    ///
    /// Comments are ordered by `created_at` ascending; the sort is stable so
    /// equal timestamps keep their stored order.
    pub fn from_parts(
        draft: TicketDraft,
        status: TicketStatus,
        assignee: Assignee,
        created_at: DateTime<Utc>,
        mut comments: Vec<Comment>,
    ) -> Self {
        comments.sort_by_key(Comment::created_at);
        let mut ticket = Self::new(draft, created_at);
        ticket.status = status;
        ticket.assignee = assignee;
        ticket.comments = comments;
        ticket
    }

    /// Owner's identity id; also the record key.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Guest name given at registration.
    pub fn name(&self) -> &GuestName {
        &self.name
    }

    /// Owner's email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Contact phone number.
    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    /// Product the inquiry concerns.
    pub fn product(&self) -> &ProductCode {
        &self.product
    }

    /// Free-text inquiry.
    pub fn message(&self) -> &InquiryText {
        &self.message
    }

    /// Current triage label.
    pub fn status(&self) -> TicketStatus {
        self.status
    }

    /// Current assignee.
    pub fn assignee(&self) -> &Assignee {
        &self.assignee
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Comment log, oldest first.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Relabel the ticket.
    ///
    /// - `unhandled` clears the assignee.
    /// - `in_progress` assigns `acting_staff`.
    /// - `resolved` keeps the assignee.
    pub fn set_status(&mut self, status: TicketStatus, acting_staff: &StaffName) {
        self.status = status;
        match status {
            TicketStatus::Unhandled => self.assignee = Assignee::Unassigned,
            TicketStatus::InProgress => self.assignee = Assignee::Staff(acting_staff.clone()),
            TicketStatus::Resolved => {}
        }
    }

    /// Append a comment unless `text` is blank.
    ///
    /// Returns [`super::TicketValidationError::CommentTooLong`] for oversize
    /// input; blank input is not an error.
    pub fn add_comment(
        &mut self,
        author: &StaffName,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<CommentOutcome, super::TicketValidationError> {
        let text = match CommentText::new(text) {
            Ok(text) => text,
            Err(super::TicketValidationError::BlankComment) => return Ok(CommentOutcome::Ignored),
            Err(other) => return Err(other),
        };
        let comment = Comment::new(author.clone(), text, now);
        self.comments.push(comment.clone());
        Ok(CommentOutcome::Appended(comment))
    }
}
