//! Identity issued by the external identity provider.
//!
//! This system only reads identities: the provider owns account creation and
//! credential checks. Both identifiers are validated on the way in so a
//! tampered session cookie or malformed store document is rejected at the
//! boundary rather than deep inside a handler.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum accepted length for an email address.
pub const EMAIL_MAX: usize = 200;
/// Maximum accepted length for an identity id.
pub const USER_ID_MAX: usize = 128;

/// Validation errors for identity values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    /// The user id was empty.
    EmptyUserId,
    /// The user id contained characters outside `[A-Za-z0-9_-]` or was too long.
    InvalidUserId,
    /// The email was empty after trimming.
    EmptyEmail,
    /// The email does not look like `local@domain.tld`.
    InvalidEmail,
    /// The email exceeded [`EMAIL_MAX`] characters.
    EmailTooLong { max: usize },
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUserId => write!(f, "user id must not be empty"),
            Self::InvalidUserId => write!(
                f,
                "user id may only contain letters, digits, '-' or '_' (max {USER_ID_MAX})"
            ),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email address is malformed"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

static USER_ID_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn user_id_regex() -> &'static Regex {
    USER_ID_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-]+$")
            .unwrap_or_else(|error| panic!("user id regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Opaque identity id issued by the identity provider.
///
/// Keys the guest's Ticket Record and Chat Thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::UserId;
    ///
    /// assert!(UserId::new("kQ2x9Yb0tPeUf3").is_ok());
    /// assert!(UserId::new("../etc").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdentityValidationError::EmptyUserId);
        }
        if id.chars().count() > USER_ID_MAX || !user_id_regex().is_match(&id) {
            return Err(IdentityValidationError::InvalidUserId);
        }
        Ok(Self(id))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Email address, trimmed and lower-cased.
///
/// Lower-casing on construction makes equality, store lookups and role
/// classification agree on one canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("  Taro@Example.com ").unwrap();
    /// assert_eq!(email.as_str(), "taro@example.com");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(IdentityValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(trimmed) {
            return Err(IdentityValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Borrow the normalised address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authenticated identity: `{ id, email }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    id: UserId,
    email: EmailAddress,
}

impl Identity {
    /// Pair an id with its email.
    pub fn new(id: UserId, email: EmailAddress) -> Self {
        Self { id, email }
    }

    /// Provider-issued id.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Account email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}
