//! Ticket Record domain types.
//!
//! One Ticket Record exists per registered identity, keyed by the owner's
//! [`UserId`](crate::domain::UserId). Contact fields are fixed at
//! registration; staff relabel `status` freely and append comments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod fields;
mod record;
#[cfg(test)]
mod tests;

pub use fields::{
    Assignee, CommentText, GuestName, InquiryText, PhoneNumber, ProductCode, StaffName,
    COMMENT_MAX, GUEST_NAME_MAX, INQUIRY_MAX, PHONE_MAX_DIGITS, PRODUCT_CATALOGUE,
    UNASSIGNED_LABEL, UNKNOWN_STAFF_NAME,
};
pub use record::{Comment, CommentOutcome, Ticket, TicketDraft};

/// Triage label of a Ticket Record.
///
/// Any status is reachable from any other; this is a relabelling tool, not a
/// workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Nobody has picked the ticket up yet.
    Unhandled,
    /// A staff member is working on it.
    InProgress,
    /// Closed out.
    Resolved,
}

impl TicketStatus {
    /// All statuses in queue bucket order.
    pub const ALL: [Self; 3] = [Self::Unhandled, Self::InProgress, Self::Resolved];

    /// Wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unhandled => "unhandled",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ticket status: {0}")]
pub struct ParseTicketStatusError(pub String);

impl FromStr for TicketStatus {
    type Err = ParseTicketStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unhandled" => Ok(Self::Unhandled),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            other => Err(ParseTicketStatusError(other.to_owned())),
        }
    }
}

/// Validation errors raised by ticket field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketValidationError {
    EmptyName,
    NameTooLong { max: usize },
    EmptyPhone,
    PhoneNotDigits,
    PhoneTooLong { max: usize },
    UnknownProduct { code: String },
    BlankInquiry,
    InquiryTooLong { max: usize },
    EmptyStaffName,
    BlankComment,
    CommentTooLong { max: usize },
}

impl TicketValidationError {
    /// Form field the error relates to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyPhone | Self::PhoneNotDigits | Self::PhoneTooLong { .. } => "phone",
            Self::UnknownProduct { .. } => "productType",
            Self::BlankInquiry | Self::InquiryTooLong { .. } => "message",
            Self::EmptyStaffName => "assignee",
            Self::BlankComment | Self::CommentTooLong { .. } => "text",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::EmptyPhone | Self::EmptyStaffName => "required",
            Self::BlankInquiry | Self::BlankComment => "blank",
            Self::NameTooLong { .. }
            | Self::PhoneTooLong { .. }
            | Self::InquiryTooLong { .. }
            | Self::CommentTooLong { .. } => "too_long",
            Self::PhoneNotDigits => "digits_only",
            Self::UnknownProduct { .. } => "unknown_product",
        }
    }
}

impl fmt::Display for TicketValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyPhone => write!(f, "phone number must not be empty"),
            Self::PhoneNotDigits => write!(f, "phone number may only contain digits"),
            Self::PhoneTooLong { max } => write!(f, "phone number must be at most {max} digits"),
            Self::UnknownProduct { code } => write!(f, "unknown product code: {code}"),
            Self::BlankInquiry => write!(f, "inquiry must not be blank"),
            Self::InquiryTooLong { max } => {
                write!(f, "inquiry must be at most {max} characters")
            }
            Self::EmptyStaffName => write!(f, "staff name must not be empty"),
            Self::BlankComment => write!(f, "comment must not be blank"),
            Self::CommentTooLong { max } => {
                write!(f, "comment must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for TicketValidationError {}
