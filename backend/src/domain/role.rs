//! Role classification.
//!
//! Role is derived, never stored: `staff` iff the lower-cased email is in the
//! configured staff set, otherwise `guest`. The set is loaded once at start-up
//! and injected, so tests can classify against any directory they like.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::EmailAddress;

/// Access role of an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Customer who registered an inquiry.
    Guest,
    /// Support staff member.
    Staff,
}

impl Role {
    /// Whether this is the staff role.
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Staff)
    }

    /// Wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured set of staff email addresses.
///
/// # Examples
/// ```
/// use helpdesk::domain::{Role, StaffDirectory};
///
/// let staff = StaffDirectory::from_list("staff1@example.com, Staff2@Example.com");
/// assert_eq!(staff.classify(Some("STAFF2@example.com")), Role::Staff);
/// assert_eq!(staff.classify(Some("taro@example.com")), Role::Guest);
/// assert_eq!(staff.classify(None), Role::Guest);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffDirectory {
    emails: BTreeSet<String>,
}

impl StaffDirectory {
    /// Build a directory from individual addresses.
    ///
    /// Entries are trimmed and lower-cased; blank entries are skipped.
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|email| email.as_ref().trim().to_lowercase())
            .filter(|email| !email.is_empty())
            .collect();
        Self { emails }
    }

    /// Build a directory from a comma-separated list.
    pub fn from_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Classify a raw, possibly absent email.
    pub fn classify(&self, email: Option<&str>) -> Role {
        let Some(email) = email else {
            return Role::Guest;
        };
        let normalised = email.trim().to_lowercase();
        if !normalised.is_empty() && self.emails.contains(&normalised) {
            Role::Staff
        } else {
            Role::Guest
        }
    }

    /// Classify a validated email.
    pub fn role_of(&self, email: &EmailAddress) -> Role {
        self.classify(Some(email.as_str()))
    }

    /// Number of configured staff addresses.
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    /// Whether no staff addresses are configured.
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}
