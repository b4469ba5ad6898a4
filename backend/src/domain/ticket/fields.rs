//! Validated Ticket Record fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TicketValidationError;

/// Maximum guest name length in characters.
pub const GUEST_NAME_MAX: usize = 16;
/// Maximum phone number length in digits.
pub const PHONE_MAX_DIGITS: usize = 12;
/// Maximum inquiry length in characters.
pub const INQUIRY_MAX: usize = 2000;
/// Maximum comment length in characters.
pub const COMMENT_MAX: usize = 4000;
/// Stored label for a ticket nobody is assigned to.
pub const UNASSIGNED_LABEL: &str = "unassigned";
/// Acting name used when a staff member has no Ticket Record of their own.
pub const UNKNOWN_STAFF_NAME: &str = "Unknown staff";

/// Product codes a guest may register an inquiry against.
pub const PRODUCT_CATALOGUE: [&str; 16] = [
    "KM-001",
    "HD-100",
    "HD-200",
    "MN-4K27",
    "WC-720P",
    "WC-1080P",
    "RT-AX3000",
    "BT-5000",
    "DS-USB4",
    "PB-20000",
    "CH-100W",
    "SP-2.1",
    "HS-WL",
    "MS-RGB",
    "KB-MEC",
    "PR-4800",
];

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Borrow the validated value.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = TicketValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

string_newtype!(
    /// Guest display name, trimmed, 1..=16 characters.
    GuestName
);

impl GuestName {
    /// Validate a guest name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TicketValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TicketValidationError::EmptyName);
        }
        if trimmed.chars().count() > GUEST_NAME_MAX {
            return Err(TicketValidationError::NameTooLong {
                max: GUEST_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

string_newtype!(
    /// Phone number made of 1..=12 ASCII digits.
    PhoneNumber
);

impl PhoneNumber {
    /// Validate an already-sanitised phone number.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::PhoneNumber;
    ///
    /// assert!(PhoneNumber::new("09012345678").is_ok());
    /// assert!(PhoneNumber::new("090-1234").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TicketValidationError> {
        let raw = raw.as_ref();
        if raw.is_empty() {
            return Err(TicketValidationError::EmptyPhone);
        }
        if !raw.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(TicketValidationError::PhoneNotDigits);
        }
        if raw.len() > PHONE_MAX_DIGITS {
            return Err(TicketValidationError::PhoneTooLong {
                max: PHONE_MAX_DIGITS,
            });
        }
        Ok(Self(raw.to_owned()))
    }
}

string_newtype!(
    /// Product code drawn from [`PRODUCT_CATALOGUE`].
    ProductCode
);

impl ProductCode {
    /// Validate a product code against the catalogue.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TicketValidationError> {
        let raw = raw.as_ref().trim();
        PRODUCT_CATALOGUE
            .iter()
            .find(|code| **code == raw)
            .map(|code| Self((*code).to_owned()))
            .ok_or_else(|| TicketValidationError::UnknownProduct {
                code: raw.to_owned(),
            })
    }
}

string_newtype!(
    /// Free-text inquiry. Must contain something other than whitespace.
    ///
    /// Whitespace follows Unicode, so an inquiry of ideographic spaces
    /// (U+3000) is blank too.
    InquiryText
);

impl InquiryText {
    /// Validate an inquiry. Surrounding whitespace is preserved.
    pub fn new(raw: impl Into<String>) -> Result<Self, TicketValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(TicketValidationError::BlankInquiry);
        }
        if raw.chars().count() > INQUIRY_MAX {
            return Err(TicketValidationError::InquiryTooLong { max: INQUIRY_MAX });
        }
        Ok(Self(raw))
    }
}

string_newtype!(
    /// Display name of a staff member acting on a ticket.
    StaffName
);

impl StaffName {
    /// Validate a staff name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TicketValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TicketValidationError::EmptyStaffName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Name used when the acting staff member has no Ticket Record.
    pub fn unknown() -> Self {
        Self(UNKNOWN_STAFF_NAME.to_owned())
    }
}

string_newtype!(
    /// Staff comment body. Trimmed; 1..=4000 characters.
    CommentText
);

impl CommentText {
    /// Validate a comment body.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TicketValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TicketValidationError::BlankComment);
        }
        if trimmed.chars().count() > COMMENT_MAX {
            return Err(TicketValidationError::CommentTooLong { max: COMMENT_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

/// Staff member responsible for a ticket.
///
/// Stored as a free-text string where [`UNASSIGNED_LABEL`] means nobody.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Assignee {
    /// Nobody has picked the ticket up.
    Unassigned,
    /// Named staff member.
    Staff(StaffName),
}

impl Assignee {
    /// Decode the stored label. Blank labels read as unassigned.
    pub fn from_label(label: &str) -> Self {
        if label.trim() == UNASSIGNED_LABEL {
            return Self::Unassigned;
        }
        StaffName::new(label).map_or(Self::Unassigned, Self::Staff)
    }

    /// Stored label.
    pub fn label(&self) -> &str {
        match self {
            Self::Unassigned => UNASSIGNED_LABEL,
            Self::Staff(name) => name.as_str(),
        }
    }
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Assignee {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<Assignee> for String {
    fn from(value: Assignee) -> Self {
        value.label().to_owned()
    }
}
